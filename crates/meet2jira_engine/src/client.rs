use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::schema;
use crate::types::{
    ApiError, ApiFailure, JiraOutcome, MeetingRecord, ProcessOutcome, TaskRecord,
};

/// Connection settings for the backend client.
#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Clock injected by the caller; the engine never reads time itself.
    pub now_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl ClientSettings {
    pub fn new(base_url: Url, now_utc: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            now_utc,
        }
    }
}

/// Fields the user controls when accepting a result.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptRequest {
    pub result_id: String,
    pub tasks_text: String,
    pub project_key: String,
    pub epic_key: String,
}

#[derive(Debug, Clone)]
pub struct RejectRequest {
    pub result_id: String,
    pub tasks_text: String,
    pub reason: String,
}

/// Wire form of a rejection; `feedback_type` and `timestamp` are filled in
/// by the client.
#[derive(Serialize)]
struct RejectPayload<'a> {
    result_id: &'a str,
    tasks_text: &'a str,
    feedback_type: &'static str,
    reason: &'a str,
    timestamp: String,
}

pub struct BackendClient {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl BackendClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::new(ApiFailure::InvalidUrl, err.to_string()))
    }

    /// POST `/file/process` with the document as multipart form data.
    pub async fn process_file(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessOutcome, ApiError> {
        engine_info!(
            "Submitting {} ({} bytes) for processing",
            file_name,
            bytes.len()
        );
        let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        if !mime_type.is_empty() {
            part = part
                .mime_str(mime_type)
                .map_err(|err| ApiError::new(ApiFailure::InvalidUrl, err.to_string()))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.endpoint("/file/process")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_json_body(response).await?;
        schema::process_outcome(body, file_name)
    }

    /// POST `/file/accept`: turn a result's task text into Jira tickets.
    pub async fn accept_result(&self, request: &AcceptRequest) -> Result<JiraOutcome, ApiError> {
        engine_info!("Accepting result {} into Jira", request.result_id);
        let response = self
            .client
            .post(self.endpoint("/file/accept")?)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_json_body(response).await?;
        schema::accept_outcome(body)
    }

    /// POST `/file/reject`: record that the user discarded a result.
    pub async fn reject_result(&self, request: &RejectRequest) -> Result<(), ApiError> {
        engine_info!("Rejecting result {}", request.result_id);
        let payload = RejectPayload {
            result_id: &request.result_id,
            tasks_text: &request.tasks_text,
            feedback_type: "reject",
            reason: &request.reason,
            timestamp: (self.settings.now_utc)(),
        };
        let response = self
            .client
            .post(self.endpoint("/file/reject")?)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_json_body(response).await?;
        schema::reject_outcome(body)
    }

    /// GET `/meetings`.
    pub async fn list_meetings(&self) -> Result<Vec<MeetingRecord>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/meetings")?)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_json_body(response).await?;
        serde_json::from_value(body)
            .map_err(|_| ApiError::new(ApiFailure::MalformedResponse, schema::UNEXPECTED_REPLY))
    }

    /// GET `/meetings/{id}/tasks`.
    pub async fn meeting_tasks(&self, meeting: i64) -> Result<Vec<TaskRecord>, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/meetings/{meeting}/tasks"))?)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_json_body(response).await?;
        let tasks: Vec<schema::TaskDto> = serde_json::from_value(body)
            .map_err(|_| ApiError::new(ApiFailure::MalformedResponse, schema::UNEXPECTED_REPLY))?;
        Ok(tasks.into_iter().map(schema::TaskDto::into_record).collect())
    }
}

/// Non-2xx replies still try to surface the backend's own error payload
/// before falling back to the bare status line.
async fn read_json_body(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<Value>(&text) {
            Ok(body) => schema::error_text(&body),
            Err(_) if !text.is_empty() => text,
            Err(_) => format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            ),
        };
        return Err(ApiError::new(ApiFailure::HttpStatus(status.as_u16()), message));
    }
    let text = response.text().await.map_err(map_transport_error)?;
    serde_json::from_str(&text)
        .map_err(|_| ApiError::new(ApiFailure::MalformedResponse, schema::UNEXPECTED_REPLY))
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    engine_warn!("transport error: {err}");
    if err.is_timeout() {
        ApiError::new(ApiFailure::Timeout, "Превышено время ожидания запроса")
    } else {
        ApiError::new(ApiFailure::Network, "Ошибка соединения с сервером")
    }
}
