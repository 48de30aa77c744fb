//! The update loop: applies messages to the shared state and executes the
//! effects they produce against the backend engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use engine_logging::engine_warn;
use meet2jira_core::{
    update, AppState, AppViewModel, CardId, CreatedTask, Effect, JiraOutcome, MeetingOverview,
    MeetingStatus, Msg, ProcessedDocument, TaskItem,
};
use meet2jira_engine::{ApiError, ApiFailure, BackendClient, MeetingRecord, MeetingsSink};

/// How long success/warning notices stay on screen.
const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Mutex<AppState>>,
    client: Arc<BackendClient>,
}

impl Dispatcher {
    pub fn new(state: AppState, client: Arc<BackendClient>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(state)),
            client,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.shared.lock().expect("lock app state").view()
    }

    /// Applies a message and runs the resulting effects to completion, so a
    /// handler returns only once the flow it triggered has settled.
    pub async fn dispatch(&self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let effects = apply_msg(&self.shared, msg);
            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    async fn run_effect(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::SubmitUpload {
                file_name,
                mime_type,
                bytes,
            } => {
                let result = self
                    .client
                    .process_file(&file_name, &mime_type, bytes)
                    .await
                    .map(|outcome| ProcessedDocument {
                        document_name: outcome.document_name,
                        model: outcome.model,
                        summary_text: outcome.summary_text,
                    })
                    .map_err(|err| err.message);
                Some(Msg::UploadFinished { result })
            }
            Effect::SubmitAccept {
                card,
                tasks_text,
                project_key,
                epic_key,
            } => {
                let request = meet2jira_engine::AcceptRequest {
                    result_id: card_result_id(card),
                    tasks_text,
                    project_key,
                    epic_key,
                };
                let result = self
                    .client
                    .accept_result(&request)
                    .await
                    .map(into_core_jira)
                    .map_err(|err| err.message);
                Some(Msg::AcceptFinished { card, result })
            }
            Effect::SubmitReject {
                card,
                tasks_text,
                reason,
            } => {
                let request = meet2jira_engine::RejectRequest {
                    result_id: card_result_id(card),
                    tasks_text,
                    reason,
                };
                let result = self
                    .client
                    .reject_result(&request)
                    .await
                    .map_err(|err| err.message);
                Some(Msg::RejectFinished { card, result })
            }
            Effect::FetchMeetingTasks { meeting } => {
                let result = self
                    .client
                    .meeting_tasks(meeting)
                    .await
                    .map(|tasks| tasks.into_iter().map(into_core_task).collect())
                    .map_err(task_load_error);
                Some(Msg::MeetingTasksLoaded { meeting, result })
            }
            Effect::ScheduleNoticeExpiry { notice } => {
                let shared = Arc::clone(&self.shared);
                tokio::spawn(async move {
                    tokio::time::sleep(NOTICE_TTL).await;
                    apply_msg(&shared, Msg::NoticeExpired { notice });
                });
                None
            }
        }
    }
}

/// The poller delivers straight into the state; `MeetingsLoaded` never
/// produces effects, so a synchronous apply is enough.
impl MeetingsSink for Dispatcher {
    fn meetings_fetched(&self, outcome: Result<Vec<MeetingRecord>, ApiError>) {
        let result = outcome
            .map(|meetings| meetings.into_iter().map(into_core_meeting).collect())
            .map_err(meetings_load_error);
        apply_msg(&self.shared, Msg::MeetingsLoaded { result });
    }
}

fn apply_msg(shared: &Mutex<AppState>, msg: Msg) -> Vec<Effect> {
    let mut guard = shared.lock().expect("lock app state");
    let state = std::mem::take(&mut *guard);
    let (state, effects) = update(state, msg);
    *guard = state;
    effects
}

/// The backend identifies feedback by the card's page element id.
fn card_result_id(card: CardId) -> String {
    format!("result-{card}")
}

fn into_core_jira(outcome: meet2jira_engine::JiraOutcome) -> JiraOutcome {
    JiraOutcome {
        created: outcome
            .created
            .into_iter()
            .map(|task| CreatedTask {
                key: task.key,
                url: task.url,
                title: task.title,
            })
            .collect(),
        errors: outcome.errors,
    }
}

fn into_core_task(task: meet2jira_engine::TaskRecord) -> TaskItem {
    TaskItem {
        title: task.title,
        description: task.description,
        priority: task.priority,
        assignee: task.assignee,
        status: task.status,
        jira_key: task.jira_key,
        jira_url: task.jira_url,
        created_at: task.created_at,
    }
}

fn into_core_meeting(meeting: MeetingRecord) -> MeetingOverview {
    MeetingOverview {
        id: meeting.id,
        title: meeting.title,
        meeting_date: meeting.meeting_date,
        created_at: meeting.created_at,
        status: map_status(meeting.status),
        participants: meeting.participants,
        duration_minutes: meeting.duration_minutes,
        file_name: meeting.file_name,
        description: meeting.description,
    }
}

fn map_status(status: meet2jira_engine::MeetingStatus) -> MeetingStatus {
    match status {
        meet2jira_engine::MeetingStatus::Scheduled => MeetingStatus::Scheduled,
        meet2jira_engine::MeetingStatus::Processing => MeetingStatus::Processing,
        meet2jira_engine::MeetingStatus::Completed => MeetingStatus::Completed,
        meet2jira_engine::MeetingStatus::Failed => MeetingStatus::Failed,
    }
}

fn meetings_load_error(err: ApiError) -> String {
    match err.kind {
        ApiFailure::Network | ApiFailure::Timeout => "Ошибка соединения с сервером".to_string(),
        _ => {
            engine_warn!("meetings fetch failed: {}", err.message);
            "Не удалось загрузить список встреч".to_string()
        }
    }
}

fn task_load_error(err: ApiError) -> String {
    match err.kind {
        ApiFailure::Network | ApiFailure::Timeout => {
            "Ошибка соединения при загрузке задач".to_string()
        }
        _ => {
            engine_warn!("task fetch failed: {}", err.message);
            "Ошибка загрузки задач".to_string()
        }
    }
}
