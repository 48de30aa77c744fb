//! Meet2Jira engine: backend HTTP client and the response schema boundary.
mod client;
mod poll;
mod schema;
mod types;

pub use client::{AcceptRequest, BackendClient, ClientSettings, RejectRequest};
pub use poll::{spawn_meetings_poll, MeetingsPollHandle, MeetingsSink};
pub use types::{
    ApiError, ApiFailure, CreatedTask, JiraOutcome, MeetingRecord, MeetingStatus, ProcessOutcome,
    TaskRecord,
};
