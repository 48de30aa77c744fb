//! Meet2Jira core: pure state machine and view-model helpers.
mod effect;
mod file;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use file::{file_icon, is_supported_file};
pub use msg::Msg;
pub use state::{
    AppState, CardId, CreatedTask, FeedbackControl, JiraOutcome, JiraPanel, MeetingId,
    MeetingOverview, MeetingStatus, MeetingsPane, Notice, NoticeId, NoticeKind,
    ProcessedDocument, ResultCard, Settings, TaskItem, TasksPane, Verdict,
};
pub use update::update;
pub use view_model::{
    AppViewModel, CardView, ControlView, JiraPanelView, MeetingDetailBody, MeetingDetailView,
    MeetingRowView, MeetingsListView, NoticeView, TaskRowView, UploadView,
};
