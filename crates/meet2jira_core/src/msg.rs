use crate::state::{
    CardId, JiraOutcome, MeetingId, MeetingOverview, NoticeId, ProcessedDocument, TaskItem,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked or dropped a file in the upload area.
    FileChosen {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// The processing request finished; `Err` carries a display message.
    UploadFinished {
        result: Result<ProcessedDocument, String>,
    },
    /// User asked to turn a result card into Jira tickets.
    AcceptClicked { card: CardId },
    /// The ticket-creation request finished.
    AcceptFinished {
        card: CardId,
        result: Result<JiraOutcome, String>,
    },
    /// User rejected a result card.
    RejectClicked { card: CardId },
    /// The rejection request finished.
    RejectFinished {
        card: CardId,
        result: Result<(), String>,
    },
    /// Fresh meetings list from the poller; replaces the previous one.
    MeetingsLoaded {
        result: Result<Vec<MeetingOverview>, String>,
    },
    /// User opened a meeting from the list.
    MeetingSelected { meeting: MeetingId },
    /// Tasks for the selected meeting arrived.
    MeetingTasksLoaded {
        meeting: MeetingId,
        result: Result<Vec<TaskItem>, String>,
    },
    /// A transient notice reached the end of its display window.
    NoticeExpired { notice: NoticeId },
}
