use crate::file::file_icon;
use crate::state::{
    AppState, CardId, CreatedTask, FeedbackControl, JiraPanel, MeetingId, MeetingOverview,
    MeetingStatus, MeetingsPane, Notice, NoticeKind, ResultCard, TaskItem, TasksPane, Verdict,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub upload: UploadView,
    pub notices: Vec<NoticeView>,
    pub results_visible: bool,
    pub cards: Vec<CardView>,
    pub meetings: MeetingsListView,
    pub selected_meeting: Option<MeetingDetailView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub busy: bool,
    pub button_label: &'static str,
    pub icon: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JiraPanelView {
    Hidden,
    Created {
        tasks: Vec<CreatedTask>,
        warnings: Vec<String>,
    },
    NothingCreated {
        errors: Vec<String>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub card: CardId,
    pub dom_id: String,
    pub icon: &'static str,
    pub document_name: String,
    pub model: String,
    pub summary_lines: Vec<String>,
    pub jira: JiraPanelView,
    pub accept: ControlView,
    pub reject: ControlView,
    /// CSS marker class once a verdict exists.
    pub mark: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingsListView {
    Loading,
    Unavailable { message: String },
    Empty,
    Rows(Vec<MeetingRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRowView {
    pub id: MeetingId,
    pub title: String,
    pub meeting_date: String,
    pub created_at: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub participants: String,
    pub duration_label: Option<String>,
    pub file_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDetailView {
    pub title: String,
    pub body: MeetingDetailBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingDetailBody {
    Placeholder(String),
    Tasks(Vec<TaskRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub assignee: String,
    pub status: String,
    pub jira: Option<(String, String)>,
    pub created_at: Option<String>,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    AppViewModel {
        upload: upload_view(state.is_processing()),
        notices: state.notices().iter().map(notice_view).collect(),
        results_visible: !state.cards().is_empty(),
        cards: state.cards().iter().map(card_view).collect(),
        meetings: meetings_view(state.meetings()),
        selected_meeting: state.selection().map(|selection| MeetingDetailView {
            title: selection.title.clone(),
            body: detail_body(selection.status, &selection.tasks),
        }),
    }
}

fn upload_view(busy: bool) -> UploadView {
    if busy {
        UploadView {
            busy,
            button_label: "Обработка...",
            icon: "⏳",
            hint: "Обрабатываем ваш документ...",
        }
    } else {
        UploadView {
            busy,
            button_label: "Выбрать файл",
            icon: "📄",
            hint: "Перетащите документ или изображение сюда или выберите файл",
        }
    }
}

fn notice_view(notice: &Notice) -> NoticeView {
    NoticeView {
        kind: match notice.kind {
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        },
        text: notice.text.clone(),
    }
}

fn card_view(card: &ResultCard) -> CardView {
    let interactive = card.verdict.is_none() && !card.feedback_busy();
    CardView {
        card: card.id,
        dom_id: card.dom_id(),
        icon: file_icon(&card.document_name),
        document_name: card.document_name.clone(),
        model: card.model.clone(),
        summary_lines: card.summary_text.lines().map(str::to_owned).collect(),
        jira: match &card.jira {
            JiraPanel::Hidden => JiraPanelView::Hidden,
            JiraPanel::Created { tasks, warnings } => JiraPanelView::Created {
                tasks: tasks.clone(),
                warnings: warnings.clone(),
            },
            JiraPanel::NothingCreated { errors } => JiraPanelView::NothingCreated {
                errors: errors.clone(),
            },
            JiraPanel::Failed { message } => JiraPanelView::Failed {
                message: message.clone(),
            },
        },
        accept: ControlView {
            label: match card.accept {
                FeedbackControl::Idle => "👍 Хороший результат",
                FeedbackControl::Sending => "⏳ Отправка...",
                FeedbackControl::Done => "✅ Обработано",
            },
            enabled: interactive && card.accept == FeedbackControl::Idle,
        },
        reject: ControlView {
            label: match card.reject {
                FeedbackControl::Idle => "👎 Плохой результат",
                FeedbackControl::Sending => "⏳ Отправка...",
                FeedbackControl::Done => "❌ Учтено",
            },
            enabled: interactive && card.reject == FeedbackControl::Idle,
        },
        mark: card.verdict.map(|verdict| match verdict {
            Verdict::Accepted => "feedback-positive",
            Verdict::Rejected => "feedback-negative",
        }),
    }
}

fn meetings_view(pane: &MeetingsPane) -> MeetingsListView {
    match pane {
        MeetingsPane::Loading => MeetingsListView::Loading,
        MeetingsPane::Unavailable { message } => MeetingsListView::Unavailable {
            message: message.clone(),
        },
        MeetingsPane::Loaded { meetings } if meetings.is_empty() => MeetingsListView::Empty,
        MeetingsPane::Loaded { meetings } => {
            MeetingsListView::Rows(meetings.iter().map(meeting_row).collect())
        }
    }
}

fn meeting_row(meeting: &MeetingOverview) -> MeetingRowView {
    let (status_label, status_class) = status_badge(meeting.status);
    MeetingRowView {
        id: meeting.id,
        title: meeting.title.clone(),
        meeting_date: meeting.meeting_date.clone(),
        created_at: meeting.created_at.clone(),
        status_label,
        status_class,
        participants: meeting
            .participants
            .clone()
            .unwrap_or_else(|| "Участники не указаны".to_string()),
        duration_label: meeting
            .duration_minutes
            .map(|minutes| format!("⏱️ {minutes} мин")),
        file_name: meeting.file_name.clone(),
        description: meeting.description.clone(),
    }
}

fn status_badge(status: MeetingStatus) -> (&'static str, &'static str) {
    match status {
        MeetingStatus::Completed => ("Завершено", "status-processed"),
        MeetingStatus::Processing => ("Обрабатывается", "status-pending"),
        MeetingStatus::Scheduled => ("Запланировано", "status-pending"),
        MeetingStatus::Failed => ("Ошибка", "status-failed"),
    }
}

fn detail_body(status: MeetingStatus, tasks: &TasksPane) -> MeetingDetailBody {
    match status {
        MeetingStatus::Failed => {
            MeetingDetailBody::Placeholder("Произошла ошибка при обработке встречи".to_string())
        }
        MeetingStatus::Processing => MeetingDetailBody::Placeholder(
            "Встреча обрабатывается, пожалуйста подождите...".to_string(),
        ),
        MeetingStatus::Scheduled => MeetingDetailBody::Placeholder(
            "Встреча запланирована, но еще не обработана".to_string(),
        ),
        MeetingStatus::Completed => match tasks {
            TasksPane::Loading => MeetingDetailBody::Placeholder("Загрузка задач...".to_string()),
            TasksPane::Failed { message } => MeetingDetailBody::Placeholder(message.clone()),
            TasksPane::Loaded(tasks) if tasks.is_empty() => MeetingDetailBody::Placeholder(
                "Задачи для этой встречи не найдены".to_string(),
            ),
            TasksPane::Loaded(tasks) => {
                MeetingDetailBody::Tasks(tasks.iter().map(task_row).collect())
            }
        },
    }
}

fn task_row(task: &TaskItem) -> TaskRowView {
    TaskRowView {
        title: task.title.clone(),
        description: task
            .description
            .clone()
            .unwrap_or_else(|| "Описание отсутствует".to_string()),
        priority: task.priority.clone().unwrap_or_else(|| "Medium".to_string()),
        assignee: task
            .assignee
            .clone()
            .unwrap_or_else(|| "Не назначен".to_string()),
        status: task.status.clone().unwrap_or_else(|| "To Do".to_string()),
        jira: task.jira_key.clone().map(|key| {
            (
                key,
                task.jira_url.clone().unwrap_or_else(|| "#".to_string()),
            )
        }),
        created_at: task.created_at.clone(),
    }
}
