use crate::view_model::AppViewModel;

pub type CardId = u64;
pub type NoticeId = u64;
pub type MeetingId = i64;

/// Jira submission defaults, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_key: String,
    pub epic_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_key: "MEET2JIRA".to_string(),
            epic_key: String::new(),
        }
    }
}

/// A successfully processed document, summary already normalized to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
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

/// Outcome of a ticket-creation request that reached Jira.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JiraOutcome {
    pub created: Vec<CreatedTask>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// Lifecycle of one feedback button. `Sending` blocks the whole card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackControl {
    #[default]
    Idle,
    Sending,
    Done,
}

/// Jira block rendered under a card's summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JiraPanel {
    #[default]
    Hidden,
    /// At least one ticket was created; `warnings` lists partial failures.
    Created {
        tasks: Vec<CreatedTask>,
        warnings: Vec<String>,
    },
    /// The request succeeded but Jira created nothing.
    NothingCreated { errors: Vec<String> },
    /// The request itself failed; the card offers a retry.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub id: CardId,
    pub document_name: String,
    pub model: String,
    pub summary_text: String,
    pub jira: JiraPanel,
    pub accept: FeedbackControl,
    pub reject: FeedbackControl,
    pub verdict: Option<Verdict>,
}

impl ResultCard {
    /// Stable element id used in form actions and anchors.
    pub fn dom_id(&self) -> String {
        format!("result-{}", self.id)
    }

    /// Feedback is a one-shot choice; once either side is in flight or a
    /// verdict exists, both buttons stay inert.
    pub(crate) fn accepts_feedback(&self) -> bool {
        self.verdict.is_none()
            && self.accept == FeedbackControl::Idle
            && self.reject == FeedbackControl::Idle
    }

    pub(crate) fn feedback_busy(&self) -> bool {
        self.accept == FeedbackControl::Sending || self.reject == FeedbackControl::Sending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub text: String,
}

/// Server-driven meeting status; the client only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingStatus {
    Scheduled,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingOverview {
    pub id: MeetingId,
    pub title: String,
    /// Backend timestamps stay as delivered; formatting is a render concern.
    pub meeting_date: String,
    pub created_at: String,
    pub status: MeetingStatus,
    pub participants: Option<String>,
    pub duration_minutes: Option<i64>,
    pub file_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<String>,
    pub jira_key: Option<String>,
    pub jira_url: Option<String>,
    pub created_at: Option<String>,
}

/// The meetings list is replaced wholesale on every poll; no diffing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MeetingsPane {
    #[default]
    Loading,
    Unavailable { message: String },
    Loaded { meetings: Vec<MeetingOverview> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasksPane {
    Loading,
    Loaded(Vec<TaskItem>),
    Failed { message: String },
}

/// Snapshot taken when a meeting is opened, so the detail view survives the
/// next poll replacing the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    pub meeting: MeetingId,
    pub title: String,
    pub status: MeetingStatus,
    pub tasks: TasksPane,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: Settings,
    processing: bool,
    next_card: CardId,
    next_notice: NoticeId,
    cards: Vec<ResultCard>,
    notices: Vec<Notice>,
    meetings: MeetingsPane,
    selection: Option<Selection>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            processing: false,
            next_card: 1,
            next_notice: 1,
            cards: Vec::new(),
            notices: Vec::new(),
            meetings: MeetingsPane::default(),
            selection: None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        crate::view_model::build(self)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cards(&self) -> &[ResultCard] {
        &self.cards
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn meetings(&self) -> &MeetingsPane {
        &self.meetings
    }

    pub(crate) fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub(crate) fn begin_processing(&mut self) {
        self.processing = true;
    }

    pub(crate) fn finish_processing(&mut self) {
        self.processing = false;
    }

    /// Prepends the new card so the list reads most recent first.
    pub(crate) fn push_card(&mut self, document: ProcessedDocument) -> CardId {
        let id = self.next_card;
        self.next_card += 1;
        self.cards.insert(
            0,
            ResultCard {
                id,
                document_name: document.document_name,
                model: document.model,
                summary_text: document.summary_text,
                jira: JiraPanel::Hidden,
                accept: FeedbackControl::Idle,
                reject: FeedbackControl::Idle,
                verdict: None,
            },
        );
        id
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut ResultCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&ResultCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub(crate) fn push_notice(&mut self, kind: NoticeKind, text: String) -> NoticeId {
        let id = self.next_notice;
        self.next_notice += 1;
        // One visible notice per kind, like the message area it replaces.
        self.notices.retain(|notice| notice.kind != kind);
        self.notices.push(Notice { id, kind, text });
        id
    }

    pub(crate) fn dismiss_notice(&mut self, id: NoticeId) {
        self.notices.retain(|notice| notice.id != id);
    }

    pub(crate) fn clear_notices(&mut self) {
        self.notices.clear();
    }

    pub(crate) fn set_meetings(&mut self, meetings: Vec<MeetingOverview>) {
        self.meetings = MeetingsPane::Loaded { meetings };
    }

    pub(crate) fn set_meetings_unavailable(&mut self, message: String) {
        self.meetings = MeetingsPane::Unavailable { message };
    }

    pub(crate) fn meeting(&self, id: MeetingId) -> Option<&MeetingOverview> {
        match &self.meetings {
            MeetingsPane::Loaded { meetings } => meetings.iter().find(|meeting| meeting.id == id),
            _ => None,
        }
    }

    pub(crate) fn select_meeting(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub(crate) fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }
}
