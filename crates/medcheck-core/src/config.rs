use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use version_migrate::DeriveQueryable as Queryable;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root of `config.toml`.
///
/// Stored on disk as the single `[[config_root]]` entry, tagged with its schema
/// version.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Queryable)]
#[queryable(entity = "config_root")]
pub struct CheckerConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the reasoning service lives and how long to wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecorderMode {
    /// `POST /save-session` on the backend.
    #[default]
    Remote,
    /// Append to a local JSON Lines file.
    File,
    Disabled,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RecorderConfig {
    #[serde(default)]
    pub mode: RecorderMode,
    /// Record file for `mode = "file"`. Defaults to `sessions.jsonl` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
