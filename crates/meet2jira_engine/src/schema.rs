//! The response schema boundary.
//!
//! The backend grew across iterations and its 2xx bodies are not uniform:
//! success is flagged as `status: "success"` or the legacy `success: true`,
//! summaries arrive as a string, an array of lines, or a nested object, and
//! error payloads spread over `message`/`error`/`error_message`/`detail`.
//! Everything coming off the wire is validated here into one of the known
//! shapes; a body matching none of them is rejected as
//! [`ApiFailure::MalformedResponse`] instead of being probed further.

use engine_logging::engine_debug;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{ApiError, ApiFailure, CreatedTask, JiraOutcome, ProcessOutcome, TaskRecord};

pub(crate) const UNKNOWN_ERROR: &str = "Неизвестная ошибка";
pub(crate) const UNEXPECTED_REPLY: &str = "Получен неожиданный ответ от сервера";

/// Keys probed, in order, when a summary arrives as an object.
const SUMMARY_KEYS: &[&str] = &["summary", "tasks", "text", "content", "message", "result"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryField {
    Text(String),
    Lines(Vec<Value>),
    Structured(serde_json::Map<String, Value>),
}

impl SummaryField {
    fn into_text(self) -> String {
        match self {
            SummaryField::Text(text) => text,
            SummaryField::Lines(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join("\n"),
            SummaryField::Structured(map) => probe_map(&map, 1).unwrap_or_else(|| {
                serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_default()
            }),
        }
    }
}

/// First non-empty candidate value in the map, descending `depth` levels
/// into nested objects.
fn probe_map(map: &serde_json::Map<String, Value>, depth: u8) -> Option<String> {
    for key in SUMMARY_KEYS {
        match map.get(*key) {
            Some(Value::String(text)) if !text.is_empty() => return Some(text.clone()),
            Some(Value::Array(items)) if !items.is_empty() => {
                return Some(items.iter().map(scalar_text).collect::<Vec<_>>().join("\n"));
            }
            Some(Value::Object(inner)) if depth > 0 => {
                if let Some(text) = probe_map(inner, depth - 1) {
                    return Some(text);
                }
            }
            _ => {}
        }
    }
    None
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Best-effort extraction of a display string from an error-like payload.
/// Total over every shape the backend has produced so far.
pub(crate) fn error_text(value: &Value) -> String {
    match value {
        Value::String(text) if !text.is_empty() => text.clone(),
        Value::Object(map) => {
            for key in ["message", "error", "error_message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    if !text.is_empty() {
                        return text.clone();
                    }
                }
            }
            match map.get("detail") {
                Some(detail) => detail_text(detail),
                None => UNKNOWN_ERROR.to_string(),
            }
        }
        _ => UNKNOWN_ERROR.to_string(),
    }
}

/// FastAPI-style `detail`: a plain string, a list of validation errors with
/// `loc`/`msg`, or some other structure dumped as JSON.
fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(text) if !text.is_empty() => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let field = item
                    .get("loc")
                    .and_then(Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .map(scalar_text)
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_else(|| "field".to_string());
                let message = item
                    .get("msg")
                    .or_else(|| item.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("validation error");
                format!("{field}: {message}")
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => serde_json::to_string(other).unwrap_or_else(|_| UNKNOWN_ERROR.to_string()),
    }
}

/// JS truthiness for the legacy `error` flag.
fn error_flagged(error: &Option<Value>) -> bool {
    match error {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

#[derive(Debug, Deserialize)]
struct ProcessReply {
    status: Option<String>,
    success: Option<bool>,
    document_name: Option<String>,
    model: Option<String>,
    summary: Option<SummaryField>,
    error: Option<Value>,
}

impl ProcessReply {
    fn succeeded(&self) -> bool {
        let flagged_ok = self.status.as_deref() == Some("success") || self.success == Some(true);
        flagged_ok && !error_flagged(&self.error)
    }
}

/// Success needs the success flag AND a non-null summary; anything else is a
/// backend-flagged failure with a message pulled from the body.
pub(crate) fn process_outcome(body: Value, fallback_name: &str) -> Result<ProcessOutcome, ApiError> {
    let reply: ProcessReply = match serde_json::from_value(body.clone()) {
        Ok(reply) => reply,
        Err(err) => {
            engine_debug!("process reply did not match schema: {err}");
            return Err(ApiError::new(ApiFailure::MalformedResponse, UNEXPECTED_REPLY));
        }
    };
    if !reply.succeeded() {
        return Err(ApiError::new(ApiFailure::Backend, error_text(&body)));
    }
    let summary = reply
        .summary
        .ok_or_else(|| ApiError::new(ApiFailure::Backend, error_text(&body)))?;
    Ok(ProcessOutcome {
        document_name: reply
            .document_name
            .unwrap_or_else(|| fallback_name.to_string()),
        model: reply.model.unwrap_or_else(|| "unknown".to_string()),
        summary_text: summary.into_text(),
    })
}

#[derive(Debug, Deserialize)]
struct AcceptReply {
    status: Option<String>,
    success: Option<bool>,
    error: Option<Value>,
    jira_result: Option<JiraResultDto>,
}

#[derive(Debug, Deserialize)]
struct JiraResultDto {
    #[serde(default)]
    created_tasks: Vec<CreatedTaskDto>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedTaskDto {
    key: Option<String>,
    url: Option<String>,
    title: Option<String>,
    summary: Option<String>,
}

pub(crate) fn accept_outcome(body: Value) -> Result<JiraOutcome, ApiError> {
    let reply: AcceptReply = match serde_json::from_value(body.clone()) {
        Ok(reply) => reply,
        Err(err) => {
            engine_debug!("accept reply did not match schema: {err}");
            return Err(ApiError::new(ApiFailure::MalformedResponse, UNEXPECTED_REPLY));
        }
    };
    let flagged_ok = reply.status.as_deref() == Some("success") || reply.success == Some(true);
    if !flagged_ok || error_flagged(&reply.error) {
        return Err(ApiError::new(ApiFailure::Backend, error_text(&body)));
    }
    // The reply is pinned to `jira_result`; older field spellings are gone.
    let jira = reply
        .jira_result
        .ok_or_else(|| ApiError::new(ApiFailure::MalformedResponse, UNEXPECTED_REPLY))?;
    let created = jira
        .created_tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| CreatedTask {
            key: task.key.unwrap_or_else(|| format!("TASK-{}", index + 1)),
            url: task.url.unwrap_or_else(|| "#".to_string()),
            title: task
                .title
                .or(task.summary)
                .unwrap_or_else(|| "Задача создана".to_string()),
        })
        .collect();
    Ok(JiraOutcome {
        created,
        errors: jira.errors,
    })
}

#[derive(Debug, Deserialize)]
struct RejectReply {
    status: Option<String>,
    success: Option<bool>,
    error: Option<Value>,
}

pub(crate) fn reject_outcome(body: Value) -> Result<(), ApiError> {
    let reply: RejectReply = match serde_json::from_value(body.clone()) {
        Ok(reply) => reply,
        Err(err) => {
            engine_debug!("reject reply did not match schema: {err}");
            return Err(ApiError::new(ApiFailure::MalformedResponse, UNEXPECTED_REPLY));
        }
    };
    let flagged_ok = reply.status.as_deref() == Some("success") || reply.success == Some(true);
    if !flagged_ok || error_flagged(&reply.error) {
        return Err(ApiError::new(ApiFailure::Backend, error_text(&body)));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskDto {
    title: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    status: Option<String>,
    jira_key: Option<String>,
    jira_url: Option<String>,
    created_at: Option<String>,
}

impl TaskDto {
    pub(crate) fn into_record(self) -> TaskRecord {
        TaskRecord {
            title: self
                .title
                .or(self.summary)
                .unwrap_or_else(|| "Задача".to_string()),
            description: self.description,
            priority: self.priority,
            assignee: self.assignee,
            status: self.status,
            jira_key: self.jira_key,
            jira_url: self.jira_url,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_string_round_trips() {
        let outcome = process_outcome(
            json!({"status": "success", "summary": "x"}),
            "doc.txt",
        )
        .expect("outcome");
        assert_eq!(outcome.summary_text, "x");
    }

    #[test]
    fn summary_array_joins_with_newlines() {
        let outcome = process_outcome(
            json!({"status": "success", "summary": ["a", "b"]}),
            "doc.txt",
        )
        .expect("outcome");
        assert_eq!(outcome.summary_text, "a\nb");
    }

    #[test]
    fn summary_object_yields_first_candidate_field() {
        let outcome = process_outcome(
            json!({"status": "success", "summary": {"tasks": "a,b"}}),
            "doc.txt",
        )
        .expect("outcome");
        assert_eq!(outcome.summary_text, "a,b");
    }

    #[test]
    fn summary_probing_recurses_one_level() {
        let outcome = process_outcome(
            json!({"status": "success", "summary": {"result": {"text": "nested"}}}),
            "doc.txt",
        )
        .expect("outcome");
        assert_eq!(outcome.summary_text, "nested");
    }

    #[test]
    fn unmatched_summary_object_is_pretty_printed() {
        let outcome = process_outcome(
            json!({"status": "success", "summary": {"unrelated": 1}}),
            "doc.txt",
        )
        .expect("outcome");
        assert!(outcome.summary_text.contains("\"unrelated\": 1"));
    }

    #[test]
    fn legacy_success_flag_is_accepted() {
        let outcome = process_outcome(
            json!({"success": true, "summary": "x", "document_name": "a.pdf", "model": "gpt-4"}),
            "doc.txt",
        )
        .expect("outcome");
        assert_eq!(outcome.document_name, "a.pdf");
        assert_eq!(outcome.model, "gpt-4");
    }

    #[test]
    fn missing_summary_is_a_backend_failure() {
        let err = process_outcome(json!({"status": "success"}), "doc.txt").unwrap_err();
        assert_eq!(err.kind, ApiFailure::Backend);
        assert_eq!(err.message, UNKNOWN_ERROR);
    }

    #[test]
    fn flagged_error_beats_the_success_status() {
        let err = process_outcome(
            json!({"status": "success", "summary": "x", "error": "модель перегружена"}),
            "doc.txt",
        )
        .unwrap_err();
        assert_eq!(err.kind, ApiFailure::Backend);
        assert_eq!(err.message, "модель перегружена");
    }

    #[test]
    fn error_text_is_total_over_known_shapes() {
        assert_eq!(error_text(&json!("plain")), "plain");
        assert_eq!(error_text(&json!({"message": "m"})), "m");
        assert_eq!(error_text(&json!({"error": "e"})), "e");
        assert_eq!(error_text(&json!({"error_message": "em"})), "em");
        assert_eq!(error_text(&json!({"detail": "d"})), "d");
        assert_eq!(error_text(&json!(null)), UNKNOWN_ERROR);
        assert_eq!(error_text(&json!(42)), UNKNOWN_ERROR);
        assert_eq!(error_text(&json!({})), UNKNOWN_ERROR);
    }

    #[test]
    fn validation_details_join_location_and_message() {
        let body = json!({
            "detail": [
                {"loc": ["body", "file"], "msg": "field required"},
                {"loc": ["query", 0], "message": "invalid value"},
                {"msg": "dangling"}
            ]
        });
        assert_eq!(
            error_text(&body),
            "body.file: field required; query.0: invalid value; field: dangling"
        );
    }

    #[test]
    fn structured_detail_is_dumped_as_json() {
        assert_eq!(
            error_text(&json!({"detail": {"code": 7}})),
            "{\"code\":7}"
        );
    }

    #[test]
    fn accept_reply_needs_the_pinned_jira_result_field() {
        let err = accept_outcome(json!({"status": "success", "task_result": {}})).unwrap_err();
        assert_eq!(err.kind, ApiFailure::MalformedResponse);
        assert_eq!(err.message, UNEXPECTED_REPLY);
    }

    #[test]
    fn accept_reply_fills_missing_task_fields() {
        let outcome = accept_outcome(json!({
            "status": "success",
            "jira_result": {
                "created_tasks": [
                    {"key": "MEET-1", "url": "https://jira/browse/MEET-1", "title": "Protocol"},
                    {"summary": "From summary"}
                ],
                "errors": ["epic not found"]
            }
        }))
        .expect("outcome");
        assert_eq!(outcome.created.len(), 2);
        assert_eq!(outcome.created[0].key, "MEET-1");
        assert_eq!(outcome.created[1].key, "TASK-2");
        assert_eq!(outcome.created[1].url, "#");
        assert_eq!(outcome.created[1].title, "From summary");
        assert_eq!(outcome.errors, vec!["epic not found".to_string()]);
    }

    #[test]
    fn reject_reply_honours_status_and_error_flag() {
        assert!(reject_outcome(json!({"status": "success"})).is_ok());
        assert!(reject_outcome(json!({"success": true})).is_ok());
        let err = reject_outcome(json!({"status": "error", "error_message": "нет такого"}))
            .unwrap_err();
        assert_eq!(err.kind, ApiFailure::Backend);
        assert_eq!(err.message, "нет такого");
    }
}
