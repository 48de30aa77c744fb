use std::sync::Arc;
use std::time::Duration;

use meet2jira_engine::{
    AcceptRequest, ApiFailure, BackendClient, ClientSettings, MeetingStatus, RejectRequest,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ClientSettings {
    ClientSettings::new(
        server.uri().parse().expect("mock server uri"),
        Arc::new(|| "2025-06-01T12:00:00Z".to_string()),
    )
}

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(settings(server)).expect("client")
}

#[tokio::test]
async fn processing_a_pdf_returns_the_normalized_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "summary": "Task A\nTask B",
            "document_name": "report.pdf",
            "model": "gpt-4"
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .process_file("report.pdf", "application/pdf", b"%PDF-1.4".to_vec())
        .await
        .expect("outcome");

    assert_eq!(outcome.document_name, "report.pdf");
    assert_eq!(outcome.model, "gpt-4");
    assert_eq!(outcome.summary_text, "Task A\nTask B");
}

#[tokio::test]
async fn legacy_success_flag_and_array_summary_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "summary": ["Task A", "Task B"]
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .process_file("notes.txt", "text/plain", b"notes".to_vec())
        .await
        .expect("outcome");

    // The file name fills in for the missing document_name field.
    assert_eq!(outcome.document_name, "notes.txt");
    assert_eq!(outcome.model, "unknown");
    assert_eq!(outcome.summary_text, "Task A\nTask B");
}

#[tokio::test]
async fn backend_flagged_failure_in_a_2xx_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error_message": "документ не распознан"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .process_file("scan.png", "image/png", b"png".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::Backend);
    assert_eq!(err.message, "документ не распознан");
}

#[tokio::test]
async fn non_json_body_is_a_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .process_file("notes.txt", "text/plain", b"notes".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::MalformedResponse);
    assert_eq!(err.message, "Получен неожиданный ответ от сервера");
}

#[tokio::test]
async fn http_422_surfaces_the_validation_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "file"], "msg": "field required"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .process_file("notes.txt", "text/plain", b"notes".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::HttpStatus(422));
    assert_eq!(err.message, "body.file: field required");
}

#[tokio::test]
async fn slow_backend_times_out_with_a_dedicated_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/process"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"status": "success", "summary": "late"})),
        )
        .mount(&server)
        .await;

    let mut settings = settings(&server);
    settings.request_timeout = Duration::from_millis(50);
    let client = BackendClient::new(settings).expect("client");

    let err = client
        .process_file("notes.txt", "text/plain", b"notes".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::Timeout);
    assert_eq!(err.message, "Превышено время ожидания запроса");
}

#[tokio::test]
async fn accepting_a_result_lists_created_tickets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/accept"))
        .and(body_partial_json(json!({
            "result_id": "result-1",
            "project_key": "MEET2JIRA"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "jira_result": {
                "success": true,
                "created_tasks": [
                    {"key": "MEET-101", "url": "https://jira/browse/MEET-101", "title": "Протокол"},
                    {"key": "MEET-102", "url": "https://jira/browse/MEET-102", "title": "Фоллоу-ап"}
                ],
                "errors": []
            }
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .accept_result(&AcceptRequest {
            result_id: "result-1".to_string(),
            tasks_text: "Task A\nTask B".to_string(),
            project_key: "MEET2JIRA".to_string(),
            epic_key: String::new(),
        })
        .await
        .expect("outcome");

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.created[0].key, "MEET-101");
    assert_eq!(outcome.created[1].title, "Фоллоу-ап");
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn accept_reply_without_jira_result_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/accept"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .accept_result(&AcceptRequest {
            result_id: "result-1".to_string(),
            tasks_text: "Task A".to_string(),
            project_key: "MEET2JIRA".to_string(),
            epic_key: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::MalformedResponse);
}

#[tokio::test]
async fn rejecting_sends_feedback_type_and_injected_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file/reject"))
        .and(body_partial_json(json!({
            "result_id": "result-3",
            "feedback_type": "reject",
            "reason": "Результат отклонен пользователем",
            "timestamp": "2025-06-01T12:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    client(&server)
        .reject_result(&RejectRequest {
            result_id: "result-3".to_string(),
            tasks_text: "Task A".to_string(),
            reason: "Результат отклонен пользователем".to_string(),
        })
        .await
        .expect("reject accepted");
}

#[tokio::test]
async fn meetings_list_is_deserialized_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "title": "Планерка",
                "meeting_date": "2025-06-02T10:00:00",
                "status": "completed",
                "duration_minutes": 45
            },
            {
                "id": 2,
                "title": "Ретро",
                "meeting_date": "2025-06-03T15:00:00",
                "created_at": "2025-06-01T09:00:00",
                "status": "processing",
                "participants": "Аня, Борис"
            }
        ])))
        .mount(&server)
        .await;

    let meetings = client(&server).list_meetings().await.expect("meetings");

    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0].status, MeetingStatus::Completed);
    assert_eq!(meetings[0].created_at, "");
    assert_eq!(meetings[1].status, MeetingStatus::Processing);
    assert_eq!(meetings[1].participants.as_deref(), Some("Аня, Борис"));
}

#[tokio::test]
async fn unknown_meeting_status_is_rejected_as_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Планерка", "status": "archived"}
        ])))
        .mount(&server)
        .await;

    let err = client(&server).list_meetings().await.unwrap_err();

    assert_eq!(err.kind, ApiFailure::MalformedResponse);
}

#[tokio::test]
async fn meeting_tasks_fall_back_to_the_summary_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings/7/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "Подготовить протокол", "priority": "High", "jira_key": "MEET-7"},
            {"summary": "Запланировать фоллоу-ап"}
        ])))
        .mount(&server)
        .await;

    let tasks = client(&server).meeting_tasks(7).await.expect("tasks");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Подготовить протокол");
    assert_eq!(tasks[0].priority.as_deref(), Some("High"));
    assert_eq!(tasks[1].title, "Запланировать фоллоу-ап");
    assert_eq!(tasks[1].jira_key, None);
}
