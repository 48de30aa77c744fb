use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Failure classification for a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    /// A 2xx body that matched no known reply shape.
    MalformedResponse,
    /// A 2xx body that flagged the failure itself.
    Backend,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::InvalidUrl => write!(f, "invalid url"),
            ApiFailure::Network => write!(f, "network error"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::MalformedResponse => write!(f, "malformed response"),
            ApiFailure::Backend => write!(f, "backend error"),
        }
    }
}

/// Error returned by [`crate::BackendClient`]; `message` is already a display
/// string suitable for the page's message area.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A processed document, its summary already normalized to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub document_name: String,
    pub model: String,
    pub summary_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub key: String,
    pub url: String,
    pub title: String,
}

/// Result of a ticket-creation request the backend acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JiraOutcome {
    pub created: Vec<CreatedTask>,
    pub errors: Vec<String>,
}

/// Server-driven meeting lifecycle; `completed` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeetingRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub meeting_date: String,
    #[serde(default)]
    pub created_at: String,
    pub status: MeetingStatus,
    #[serde(default)]
    pub participants: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<String>,
    pub jira_key: Option<String>,
    pub jira_url: Option<String>,
    pub created_at: Option<String>,
}
