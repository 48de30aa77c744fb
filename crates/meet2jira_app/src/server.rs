//! Web routes for the front end page and its form posts.

use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;
use engine_logging::engine_warn;
use meet2jira_core::Msg;

use crate::dispatch::Dispatcher;
use crate::ui;

pub fn build_router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/upload", post(upload_file))
        .route("/results/:card/accept", post(accept_result))
        .route("/results/:card/reject", post(reject_result))
        .route("/meetings/:meeting", get(open_meeting))
        .with_state(dispatcher)
}

async fn index_page(State(dispatcher): State<Dispatcher>) -> Html<String> {
    Html(ui::render::page(&dispatcher.view()))
}

/// Receives the browser's multipart upload and hands the file to the core.
/// An empty file input is a no-op, like submitting the form without a pick.
async fn upload_file(State(dispatcher): State<Dispatcher>, mut multipart: Multipart) -> Redirect {
    let mut file = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, mime_type, bytes.to_vec())),
                    Err(err) => engine_warn!("failed to read uploaded file: {err}"),
                }
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(err) => {
                engine_warn!("malformed multipart upload: {err}");
                break;
            }
        }
    }

    if let Some((file_name, mime_type, bytes)) = file {
        if !file_name.is_empty() {
            dispatcher
                .dispatch(Msg::FileChosen {
                    file_name,
                    mime_type,
                    bytes,
                })
                .await;
        }
    }
    Redirect::to("/#results")
}

async fn accept_result(State(dispatcher): State<Dispatcher>, Path(card): Path<u64>) -> Redirect {
    dispatcher.dispatch(Msg::AcceptClicked { card }).await;
    Redirect::to("/#results")
}

async fn reject_result(State(dispatcher): State<Dispatcher>, Path(card): Path<u64>) -> Redirect {
    dispatcher.dispatch(Msg::RejectClicked { card }).await;
    Redirect::to("/#results")
}

/// Selecting a meeting fetches its tasks (when completed) before rendering,
/// so the detail pane is already filled in on the response.
async fn open_meeting(State(dispatcher): State<Dispatcher>, Path(meeting): Path<i64>) -> Html<String> {
    dispatcher.dispatch(Msg::MeetingSelected { meeting }).await;
    Html(ui::render::page(&dispatcher.view()))
}
