use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::engine_info;
use meet2jira_app::{build_router, config, logging, Dispatcher};
use meet2jira_core::{AppState, Settings};
use meet2jira_engine::{spawn_meetings_poll, BackendClient, ClientSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);
    let config = config::load();
    engine_info!(
        "Starting Meet2Jira front end on {} (backend {})",
        config.listen_addr,
        config.backend_url
    );

    let now_utc: Arc<dyn Fn() -> String + Send + Sync> =
        Arc::new(|| chrono::Utc::now().to_rfc3339());
    let base_url = config
        .backend_url
        .parse()
        .context("invalid backend_url in configuration")?;
    let mut client_settings = ClientSettings::new(base_url, now_utc);
    client_settings.request_timeout = Duration::from_secs(config.request_timeout_secs);
    let client = Arc::new(BackendClient::new(client_settings)?);

    let state = AppState::new(Settings {
        project_key: config.project_key.clone(),
        epic_key: config.epic_key.clone(),
    });
    let dispatcher = Dispatcher::new(state, Arc::clone(&client));

    // The poll lives exactly as long as the page it feeds.
    let poll = spawn_meetings_poll(
        client,
        Duration::from_secs(config.poll_interval_secs),
        Arc::new(dispatcher.clone()),
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .context("bind listen address")?;
    axum::serve(listener, build_router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve web ui")?;

    poll.shutdown().await;
    engine_info!("Meet2Jira front end stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
