use crate::state::{CardId, MeetingId, NoticeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post the file to the processing endpoint.
    SubmitUpload {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// Post the card's task text to the ticket-creation endpoint.
    SubmitAccept {
        card: CardId,
        tasks_text: String,
        project_key: String,
        epic_key: String,
    },
    /// Post the card's task text and a reason to the rejection endpoint.
    SubmitReject {
        card: CardId,
        tasks_text: String,
        reason: String,
    },
    /// Fetch the task list of a completed meeting.
    FetchMeetingTasks { meeting: MeetingId },
    /// Dismiss a success/warning notice after its display window.
    ScheduleNoticeExpiry { notice: NoticeId },
}
