use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::client::BackendClient;
use crate::types::{ApiError, MeetingRecord};

/// Receives each poll result; implemented by the app shell.
pub trait MeetingsSink: Send + Sync + 'static {
    fn meetings_fetched(&self, outcome: Result<Vec<MeetingRecord>, ApiError>);
}

/// Handle to a running meetings poll. Dropping it does not stop the task;
/// call [`MeetingsPollHandle::shutdown`] (or `cancel`) when the view goes
/// away.
pub struct MeetingsPollHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl MeetingsPollHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancels the poll and waits for the task to wind down.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}

/// Fetches the meetings list immediately, then again every `interval`.
/// Iterations run sequentially, so polls never overlap; cancellation aborts
/// an in-flight fetch as well as the sleep.
pub fn spawn_meetings_poll(
    client: Arc<BackendClient>,
    interval: Duration,
    sink: Arc<dyn MeetingsSink>,
) -> MeetingsPollHandle {
    let token = CancellationToken::new();
    let poll_token = token.clone();
    let task = tokio::spawn(async move {
        engine_info!("meetings poll started (every {:?})", interval);
        loop {
            tokio::select! {
                _ = poll_token.cancelled() => break,
                outcome = client.list_meetings() => {
                    if let Err(err) = &outcome {
                        engine_warn!("meetings poll failed: {} ({})", err.message, err.kind);
                    }
                    sink.meetings_fetched(outcome);
                }
            }
            tokio::select! {
                _ = poll_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        engine_info!("meetings poll stopped");
    });
    MeetingsPollHandle { token, task }
}
