//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use agora_governance::ExecutionMode;
use agora_utils::LogFormat;

use crate::ServiceError;

/// Configuration for the agora service and CLI.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Pinning credentials have no
/// defaults and must come from the file or the environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// `PROD`, `DEV` or `TEST`. Anything but `PROD` skips balance checks.
    #[serde(default)]
    pub app_env: ExecutionMode,

    /// Base URL of the snapshot (balance oracle) service.
    #[serde(default = "default_snapshot_url")]
    pub snapshot_url: String,

    /// Base URL of the pinning service.
    #[serde(default = "default_pinata_url")]
    pub pinata_url: String,

    #[serde(default)]
    pub pinata_api_key: String,

    #[serde(default)]
    pub pinata_secret_api_key: String,

    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout for outbound HTTP calls, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_snapshot_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_pinata_url() -> String {
    agora_pinning::client::DEFAULT_BASE_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./agora_data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn has_pinning_credentials(&self) -> bool {
        !self.pinata_api_key.is_empty() && !self.pinata_secret_api_key.is_empty()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            app_env: ExecutionMode::default(),
            snapshot_url: default_snapshot_url(),
            pinata_url: default_pinata_url(),
            pinata_api_key: String::new(),
            pinata_secret_api_key: String::new(),
            data_dir: default_data_dir(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
