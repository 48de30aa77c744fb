//! Startup configuration, read from `./meet2jira.ron` in the working
//! directory. A missing or unparsable file falls back to defaults.

use std::fs;
use std::path::Path;

use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "meet2jira.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin of the processing backend.
    pub backend_url: String,
    /// Address the web UI listens on.
    pub listen_addr: String,
    /// Jira project tickets are created in.
    pub project_key: String,
    /// Optional epic new tickets are attached to.
    pub epic_key: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            listen_addr: "127.0.0.1:3000".to_string(),
            project_key: "MEET2JIRA".to_string(),
            epic_key: String::new(),
            poll_interval_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

pub fn load() -> AppConfig {
    load_from(Path::new(CONFIG_FILENAME))
}

pub fn load_from(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("No {:?} found, using default configuration", path);
            return AppConfig::default();
        }
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
