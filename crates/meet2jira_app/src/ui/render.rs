//! Server-side HTML rendering of the core view model.
//!
//! Every string coming from the backend or the user goes through
//! [`escape_html`] before it reaches the page; summaries keep their line
//! breaks as `<br>`.

use chrono::NaiveDateTime;
use meet2jira_core::{
    AppViewModel, CardView, JiraPanelView, MeetingDetailBody, MeetingDetailView, MeetingRowView,
    MeetingsListView, NoticeView, TaskRowView, UploadView,
};

pub fn page(view: &AppViewModel) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Meet2Jira</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, sans-serif; background: #f5f6fa; color: #2f3640; margin: 0; }}
        .container {{ max-width: 860px; margin: 0 auto; padding: 24px; }}
        .upload-area {{ border: 2px dashed #b2bec3; border-radius: 10px; padding: 32px; text-align: center; background: #fff; }}
        .upload-area.processing {{ opacity: 0.7; }}
        .message {{ padding: 10px 14px; border-radius: 6px; margin: 10px 0; }}
        .message.success {{ background: #dff9e7; }}
        .message.warning {{ background: #fff3cd; }}
        .message.error {{ background: #ffe3e3; }}
        .result-card {{ background: #fff; border-radius: 10px; padding: 18px; margin: 14px 0; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }}
        .result-card.feedback-positive {{ border-left: 4px solid #2ecc71; }}
        .result-card.feedback-negative {{ border-left: 4px solid #e74c3c; }}
        .result-header {{ display: flex; justify-content: space-between; }}
        .summary-content {{ white-space: normal; margin: 8px 0; }}
        .meeting-item {{ display: block; background: #fff; border-radius: 8px; padding: 12px; margin: 8px 0; text-decoration: none; color: inherit; }}
        .meeting-status {{ padding: 2px 8px; border-radius: 10px; font-size: 12px; }}
        .status-processed {{ background: #dff9e7; }}
        .status-pending {{ background: #fff3cd; }}
        .status-failed {{ background: #ffe3e3; }}
        .empty-meetings {{ color: #636e72; padding: 12px; }}
        .feedback-btn, .upload-btn, .retry-btn {{ padding: 8px 14px; border-radius: 6px; border: 1px solid #b2bec3; background: #fff; cursor: pointer; }}
        .feedback-btn:disabled, .upload-btn:disabled {{ opacity: 0.6; cursor: default; }}
        .action-buttons {{ display: flex; gap: 10px; }}
        .action-buttons form {{ display: inline; }}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>📋 Meet2Jira</h1>
            <p class="subtitle">Загрузите документ встречи — получите задачи для Jira</p>
        </header>
        <div id="message">{notices}</div>
{upload}
{results}
{meetings}
    </div>
</body>
</html>
"#,
        notices = notices_html(&view.notices),
        upload = upload_html(&view.upload),
        results = results_html(view),
        meetings = meetings_html(view),
    )
}

fn notices_html(notices: &[NoticeView]) -> String {
    notices
        .iter()
        .map(|notice| {
            format!(
                r#"<div class="message {kind}">{text}</div>"#,
                kind = notice.kind,
                text = escape_html(&notice.text),
            )
        })
        .collect()
}

fn upload_html(upload: &UploadView) -> String {
    let processing_class = if upload.busy { " processing" } else { "" };
    let disabled = if upload.busy { " disabled" } else { "" };
    let indicator = if upload.busy {
        r#"
        <div class="processing-indicator">⏳ Обрабатываем ваш документ...</div>"#
    } else {
        ""
    };
    format!(
        r#"    <section class="upload-section">
        <div class="upload-area{processing_class}" id="uploadArea">
            <div class="upload-icon">{icon}</div>
            <p class="upload-text">{hint}</p>
            <form action="/upload" method="post" enctype="multipart/form-data">
                <input type="file" name="file" id="fileInput"{disabled}>
                <button type="submit" class="upload-btn"{disabled}>{label}</button>
            </form>{indicator}
        </div>
    </section>"#,
        icon = upload.icon,
        hint = upload.hint,
        label = upload.button_label,
    )
}

fn results_html(view: &AppViewModel) -> String {
    if !view.results_visible {
        return String::new();
    }
    let cards: String = view.cards.iter().map(card_html).collect();
    format!(
        r#"    <section class="results-section" id="results">
        <h2>Результаты обработки</h2>
        <div id="resultsList">{cards}</div>
    </section>"#
    )
}

fn card_html(card: &CardView) -> String {
    let mark = card.mark.map(|class| format!(" {class}")).unwrap_or_default();
    let summary = card
        .summary_lines
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>");
    format!(
        r#"
            <div class="result-card{mark}" id="{dom_id}">
                <div class="result-header">
                    <div class="document-name">{icon} {name}</div>
                    <div class="model-badge">🤖 {model}</div>
                </div>
                <div class="summary-label">Найденные задачи:</div>
                <div class="summary-content">{summary}</div>{jira}
                <div class="action-buttons">
                    <form method="post" action="/results/{id}/accept">
                        <button type="submit" class="feedback-btn accept-btn"{accept_disabled}>{accept_label}</button>
                    </form>
                    <form method="post" action="/results/{id}/reject">
                        <button type="submit" class="feedback-btn reject-btn"{reject_disabled}>{reject_label}</button>
                    </form>
                </div>
            </div>"#,
        dom_id = card.dom_id,
        icon = card.icon,
        name = escape_html(&card.document_name),
        model = escape_html(&card.model),
        jira = jira_panel_html(card),
        id = card.card,
        accept_disabled = disabled_attr(card.accept.enabled),
        accept_label = card.accept.label,
        reject_disabled = disabled_attr(card.reject.enabled),
        reject_label = card.reject.label,
    )
}

fn jira_panel_html(card: &CardView) -> String {
    match &card.jira {
        JiraPanelView::Hidden => String::new(),
        JiraPanelView::Created { tasks, warnings } => {
            let items: String = tasks
                .iter()
                .enumerate()
                .map(|(index, task)| {
                    format!(
                        r#"
                        <div class="jira-task-item">
                            <span class="task-number">{number}.</span>
                            <a href="{url}" target="_blank" class="jira-task-link">🎯 <strong>{key}</strong>: {title}</a>
                        </div>"#,
                        number = index + 1,
                        url = escape_html(&task.url),
                        key = escape_html(&task.key),
                        title = escape_html(&task.title),
                    )
                })
                .collect();
            let warnings_block = if warnings.is_empty() {
                String::new()
            } else {
                let items: String = warnings
                    .iter()
                    .map(|warning| format!("<li>{}</li>", escape_html(warning)))
                    .collect();
                format!(
                    r#"
                <div class="jira-warnings">
                    <h4>⚠️ Предупреждения:</h4>
                    <ul>{items}</ul>
                </div>"#
                )
            };
            format!(
                r#"
                <div class="jira-success">
                    <h4>✅ Создано задач в Jira: {count}</h4>
                    <div class="jira-tasks-list">{items}</div>
                </div>{warnings_block}"#,
                count = tasks.len(),
            )
        }
        JiraPanelView::NothingCreated { errors } => {
            let items: String = errors
                .iter()
                .map(|error| format!("<li>{}</li>", escape_html(error)))
                .collect();
            format!(
                r#"
                <div class="jira-error">
                    <h4>❌ Ошибки при создании задач ({count})</h4>
                    <ul class="error-list">{items}</ul>
                </div>"#,
                count = errors.len(),
            )
        }
        JiraPanelView::Failed { message } => format!(
            r#"
                <div class="jira-error">
                    <h4>❌ Ошибка создания задач</h4>
                    <p class="error-message">{message}</p>
                    <form method="post" action="/results/{id}/accept">
                        <button type="submit" class="retry-btn">🔄 Попробовать снова</button>
                    </form>
                </div>"#,
            message = escape_html(message),
            id = card.card,
        ),
    }
}

fn meetings_html(view: &AppViewModel) -> String {
    let list = match &view.meetings {
        MeetingsListView::Loading => {
            r#"<div class="empty-meetings">Загрузка встреч...</div>"#.to_string()
        }
        MeetingsListView::Unavailable { message } => format!(
            r#"<div class="empty-meetings" style="color: #d32f2f;">{}</div>"#,
            escape_html(message)
        ),
        MeetingsListView::Empty => {
            r#"<div class="empty-meetings">Встречи не найдены</div>"#.to_string()
        }
        MeetingsListView::Rows(rows) => rows.iter().map(meeting_row_html).collect(),
    };
    let detail = view
        .selected_meeting
        .as_ref()
        .map(meeting_detail_html)
        .unwrap_or_default();
    format!(
        r#"    <section class="meetings-section">
        <h2>Встречи</h2>
        <div id="meetingsList">{list}</div>{detail}
    </section>"#
    )
}

fn meeting_row_html(row: &MeetingRowView) -> String {
    let duration = row
        .duration_label
        .as_ref()
        .map(|label| format!(r#"<div class="meeting-duration">{label}</div>"#))
        .unwrap_or_default();
    let file = row
        .file_name
        .as_ref()
        .map(|name| format!(r#"<div class="meeting-file">📄 {}</div>"#, escape_html(name)))
        .unwrap_or_default();
    let created = if row.created_at.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="meeting-created">📝 Создано: {}</div>"#,
            format_timestamp(&row.created_at, "%d.%m.%y %H:%M")
        )
    };
    let description = row
        .description
        .as_ref()
        .map(|text| format!(r#"<div class="meeting-description">{}</div>"#, escape_html(text)))
        .unwrap_or_default();
    format!(
        r#"
            <a class="meeting-item" href="/meetings/{id}">
                <div class="meeting-title">{title}</div>
                <div class="meeting-date">📅 {date}</div>
                <div class="meeting-participants">👥 {participants}</div>
                {duration}{file}{created}
                <span class="meeting-status {status_class}">{status_label}</span>
                {description}
            </a>"#,
        id = row.id,
        title = escape_html(&row.title),
        date = format_timestamp(&row.meeting_date, "%d.%m.%Y %H:%M"),
        participants = escape_html(&row.participants),
        status_class = row.status_class,
        status_label = row.status_label,
    )
}

fn meeting_detail_html(detail: &MeetingDetailView) -> String {
    let body = match &detail.body {
        MeetingDetailBody::Placeholder(text) => format!(
            r#"<div class="result-item">{}</div>"#,
            escape_html(text)
        ),
        MeetingDetailBody::Tasks(tasks) => tasks.iter().map(task_row_html).collect(),
    };
    format!(
        r#"
        <div class="meeting-results" id="meeting-results">
            <h3>{title}</h3>
            {body}
        </div>"#,
        title = escape_html(&detail.title),
    )
}

fn task_row_html(task: &TaskRowView) -> String {
    let jira = task
        .jira
        .as_ref()
        .map(|(key, url)| {
            format!(
                r#"<p><strong>Jira:</strong> <a href="{url}" target="_blank">{key}</a></p>"#,
                url = escape_html(url),
                key = escape_html(key),
            )
        })
        .unwrap_or_default();
    let created = task
        .created_at
        .as_ref()
        .map(|raw| {
            format!(
                "<p><small>Создано: {}</small></p>",
                format_timestamp(raw, "%d.%m.%Y")
            )
        })
        .unwrap_or_default();
    format!(
        r#"
            <div class="result-item">
                <h3>{title}</h3>
                <p><strong>Описание:</strong> {description}</p>
                <p><strong>Приоритет:</strong> {priority}</p>
                <p><strong>Исполнитель:</strong> {assignee}</p>
                <p><strong>Статус:</strong> {status}</p>
                {jira}{created}
            </div>"#,
        title = escape_html(&task.title),
        description = escape_html(&task.description),
        priority = escape_html(&task.priority),
        assignee = escape_html(&task.assignee),
        status = escape_html(&task.status),
    )
}

fn disabled_attr(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        " disabled"
    }
}

/// Timestamps arrive as RFC 3339 or a bare `YYYY-MM-DDTHH:MM:SS`; anything
/// unparsable is shown as-is.
fn format_timestamp(raw: &str, pattern: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format(pattern).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(pattern).to_string();
    }
    raw.to_string()
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
