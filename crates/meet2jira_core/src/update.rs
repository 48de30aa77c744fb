use crate::state::{
    FeedbackControl, JiraPanel, MeetingStatus, NoticeKind, Selection, TasksPane, Verdict,
};
use crate::{is_supported_file, AppState, Effect, Msg};

const UNSUPPORTED_FILE: &str = "Неподдерживаемый формат файла. Используйте PDF, DOCX, TXT, MD, \
     изображения (JPG, PNG, TIFF, BMP) или аудио (MP3, WAV, M4A, OGG, FLAC).";
const PROCESSED_OK: &str = "Документ успешно обработан!";
const REJECT_REASON: &str = "Результат отклонен пользователем";
const JIRA_NOTHING_CREATED: &str = "Ошибки при создании задач в Jira";
const FEEDBACK_RECORDED: &str = "Обратная связь учтена!";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen {
            file_name,
            mime_type,
            bytes,
        } => {
            // One upload at a time; further picks are ignored until the
            // current one resolves.
            if state.is_processing() {
                return (state, Vec::new());
            }
            if !is_supported_file(&file_name, &mime_type) {
                state.push_notice(NoticeKind::Error, UNSUPPORTED_FILE.to_string());
                return (state, Vec::new());
            }
            state.clear_notices();
            state.begin_processing();
            vec![Effect::SubmitUpload {
                file_name,
                mime_type,
                bytes,
            }]
        }
        Msg::UploadFinished { result } => {
            // The upload area comes back no matter how the request ended.
            state.finish_processing();
            match result {
                Ok(document) => {
                    state.push_card(document);
                    let notice = state.push_notice(NoticeKind::Success, PROCESSED_OK.to_string());
                    vec![Effect::ScheduleNoticeExpiry { notice }]
                }
                Err(message) => {
                    state.push_notice(NoticeKind::Error, format!("Ошибка: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::AcceptClicked { card } => {
            let (project_key, epic_key) = {
                let settings = state.settings();
                (settings.project_key.clone(), settings.epic_key.clone())
            };
            match state.card_mut(card) {
                Some(found) if found.accepts_feedback() => {
                    found.accept = FeedbackControl::Sending;
                    let tasks_text = found.summary_text.clone();
                    vec![Effect::SubmitAccept {
                        card,
                        tasks_text,
                        project_key,
                        epic_key,
                    }]
                }
                _ => Vec::new(),
            }
        }
        Msg::AcceptFinished { card, result } => {
            let mut notice = None;
            if let Some(found) = state.card_mut(card) {
                if found.accept == FeedbackControl::Sending {
                    match result {
                        Ok(outcome) => {
                            found.accept = FeedbackControl::Done;
                            found.verdict = Some(Verdict::Accepted);
                            let created = outcome.created.len();
                            if created > 0 {
                                // Partial failures downgrade the notice but
                                // still list whatever was created.
                                let kind = if outcome.errors.is_empty() {
                                    NoticeKind::Success
                                } else {
                                    NoticeKind::Warning
                                };
                                found.jira = JiraPanel::Created {
                                    tasks: outcome.created,
                                    warnings: outcome.errors,
                                };
                                notice = Some((
                                    kind,
                                    format!("Создано {created} {} в Jira", task_word(created)),
                                ));
                            } else {
                                found.jira = JiraPanel::NothingCreated {
                                    errors: outcome.errors,
                                };
                                notice = Some((NoticeKind::Error, JIRA_NOTHING_CREATED.to_string()));
                            }
                        }
                        Err(message) => {
                            found.accept = FeedbackControl::Idle;
                            found.jira = JiraPanel::Failed {
                                message: message.clone(),
                            };
                            notice = Some((
                                NoticeKind::Error,
                                format!("Ошибка создания задач: {message}"),
                            ));
                        }
                    }
                }
            }
            push_outcome_notice(&mut state, notice)
        }
        Msg::RejectClicked { card } => match state.card_mut(card) {
            Some(found) if found.accepts_feedback() => {
                found.reject = FeedbackControl::Sending;
                let tasks_text = found.summary_text.clone();
                vec![Effect::SubmitReject {
                    card,
                    tasks_text,
                    reason: REJECT_REASON.to_string(),
                }]
            }
            _ => Vec::new(),
        },
        Msg::RejectFinished { card, result } => {
            let mut notice = None;
            if let Some(found) = state.card_mut(card) {
                if found.reject == FeedbackControl::Sending {
                    match result {
                        Ok(()) => {
                            found.reject = FeedbackControl::Done;
                            found.verdict = Some(Verdict::Rejected);
                            notice = Some((NoticeKind::Success, FEEDBACK_RECORDED.to_string()));
                        }
                        Err(message) => {
                            found.reject = FeedbackControl::Idle;
                            notice = Some((
                                NoticeKind::Error,
                                format!("Ошибка обратной связи: {message}"),
                            ));
                        }
                    }
                }
            }
            push_outcome_notice(&mut state, notice)
        }
        Msg::MeetingsLoaded { result } => {
            match result {
                Ok(meetings) => state.set_meetings(meetings),
                Err(message) => state.set_meetings_unavailable(message),
            }
            Vec::new()
        }
        Msg::MeetingSelected { meeting } => {
            let snapshot = state
                .meeting(meeting)
                .map(|found| (found.title.clone(), found.status));
            match snapshot {
                Some((title, status)) => {
                    state.select_meeting(Selection {
                        meeting,
                        title,
                        status,
                        tasks: TasksPane::Loading,
                    });
                    if status == MeetingStatus::Completed {
                        vec![Effect::FetchMeetingTasks { meeting }]
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            }
        }
        Msg::MeetingTasksLoaded { meeting, result } => {
            if let Some(selection) = state.selection_mut() {
                // Ignore replies for meetings deselected in the meantime.
                if selection.meeting == meeting {
                    selection.tasks = match result {
                        Ok(tasks) => TasksPane::Loaded(tasks),
                        Err(message) => TasksPane::Failed { message },
                    };
                }
            }
            Vec::new()
        }
        Msg::NoticeExpired { notice } => {
            state.dismiss_notice(notice);
            Vec::new()
        }
    };

    (state, effects)
}

fn push_outcome_notice(
    state: &mut AppState,
    notice: Option<(NoticeKind, String)>,
) -> Vec<Effect> {
    match notice {
        Some((kind, text)) => {
            let id = state.push_notice(kind, text);
            if kind == NoticeKind::Error {
                Vec::new()
            } else {
                vec![Effect::ScheduleNoticeExpiry { notice: id }]
            }
        }
        None => Vec::new(),
    }
}

/// Russian plural form for "задача" after a count.
fn task_word(count: usize) -> &'static str {
    let tens = count % 100;
    let ones = count % 10;
    if ones == 1 && tens != 11 {
        "задача"
    } else if (2..=4).contains(&ones) && !(12..=14).contains(&tens) {
        "задачи"
    } else {
        "задач"
    }
}
