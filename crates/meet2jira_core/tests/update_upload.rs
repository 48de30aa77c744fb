use std::sync::Once;

use meet2jira_core::{
    update, AppState, Effect, Msg, NoticeKind, ProcessedDocument, Settings,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn choose_file(state: AppState, file_name: &str, mime_type: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::FileChosen {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: b"payload".to_vec(),
        },
    )
}

fn processed(document_name: &str) -> ProcessedDocument {
    ProcessedDocument {
        document_name: document_name.to_string(),
        model: "gpt-4".to_string(),
        summary_text: "Task A\nTask B".to_string(),
    }
}

#[test]
fn valid_file_starts_processing_and_submits_upload() {
    init_logging();
    let state = AppState::new(Settings::default());

    let (state, effects) = choose_file(state, "report.pdf", "application/pdf");

    assert!(state.is_processing());
    assert!(state.view().upload.busy);
    assert_eq!(
        effects,
        vec![Effect::SubmitUpload {
            file_name: "report.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"payload".to_vec(),
        }]
    );
}

#[test]
fn unsupported_file_is_rejected_with_error_notice() {
    init_logging();
    let state = AppState::new(Settings::default());

    let (state, effects) = choose_file(state, "video.mkv", "video/x-matroska");

    assert!(effects.is_empty());
    assert!(!state.is_processing());
    let notices = state.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert!(notices[0].text.starts_with("Неподдерживаемый формат файла"));
}

#[test]
fn second_file_is_ignored_while_processing() {
    init_logging();
    let state = AppState::new(Settings::default());
    let (state, _effects) = choose_file(state, "report.pdf", "application/pdf");

    let (state, effects) = choose_file(state, "notes.txt", "text/plain");

    assert!(effects.is_empty());
    assert!(state.is_processing());
}

#[test]
fn successful_upload_creates_card_and_transient_notice() {
    init_logging();
    let state = AppState::new(Settings::default());
    let (state, _effects) = choose_file(state, "report.pdf", "application/pdf");

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(processed("report.pdf")),
        },
    );

    assert!(!state.is_processing());
    let view = state.view();
    assert!(view.results_visible);
    assert_eq!(view.cards.len(), 1);
    let card = &view.cards[0];
    assert_eq!(card.icon, "📕");
    assert_eq!(card.document_name, "report.pdf");
    assert_eq!(card.model, "gpt-4");
    assert_eq!(card.summary_lines, vec!["Task A", "Task B"]);
    assert!(card.accept.enabled);
    assert!(card.reject.enabled);
    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].kind, "success");
    assert_eq!(
        effects,
        vec![Effect::ScheduleNoticeExpiry {
            notice: state.notices()[0].id
        }]
    );
}

#[test]
fn failed_upload_keeps_results_empty_and_shows_error() {
    init_logging();
    let state = AppState::new(Settings::default());
    let (state, _effects) = choose_file(state, "report.pdf", "application/pdf");

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Err("сервер недоступен".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.is_processing());
    let view = state.view();
    assert!(view.cards.is_empty());
    assert!(!view.results_visible);
    assert_eq!(view.notices[0].kind, "error");
    assert_eq!(view.notices[0].text, "Ошибка: сервер недоступен");
}

#[test]
fn newest_card_is_rendered_first() {
    init_logging();
    let state = AppState::new(Settings::default());
    let (state, _) = choose_file(state, "first.txt", "text/plain");
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            result: Ok(processed("first.txt")),
        },
    );
    let (state, _) = choose_file(state, "second.txt", "text/plain");
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            result: Ok(processed("second.txt")),
        },
    );

    let view = state.view();
    assert_eq!(view.cards.len(), 2);
    assert_eq!(view.cards[0].document_name, "second.txt");
    assert_eq!(view.cards[1].document_name, "first.txt");
    // Counter-based ids never collide, even for back-to-back uploads.
    assert_ne!(view.cards[0].dom_id, view.cards[1].dom_id);
}

#[test]
fn expired_notice_is_dismissed() {
    init_logging();
    let state = AppState::new(Settings::default());
    let (state, _) = choose_file(state, "report.pdf", "application/pdf");
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(processed("report.pdf")),
        },
    );
    let notice = match &effects[0] {
        Effect::ScheduleNoticeExpiry { notice } => *notice,
        other => panic!("unexpected effect {other:?}"),
    };

    let (state, effects) = update(state, Msg::NoticeExpired { notice });

    assert!(effects.is_empty());
    assert!(state.view().notices.is_empty());
}
