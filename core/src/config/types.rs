use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ports at or below this value are rejected for the dev server.
pub const MIN_DEV_SERVER_PORT: u16 = 10000;
pub const DEFAULT_DEV_SERVER_PORT: u16 = 10086;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dev_server: DevServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, e.g. "http://localhost:8000/api".
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_api_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted session/settings records. Empty or unset uses ~/.texton/storage.
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sampling period of the idle-lock monitor.
    #[serde(default = "default_idle_poll_secs")]
    pub idle_poll_secs: u64,
}

fn default_idle_poll_secs() -> u64 {
    10
}

impl SessionConfig {
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.idle_poll_secs.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_poll_secs: default_idle_poll_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "texton_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_dev_host")]
    pub host: String,

    #[serde(default = "default_dev_port")]
    pub port: u16,

    /// Upstream origin for `/api` requests, without the `/api` suffix.
    #[serde(default = "default_api_target")]
    pub api_target: String,

    /// Directory holding the built UI bundle.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_dev_host() -> String {
    "127.0.0.1".to_string()
}

fn default_dev_port() -> u16 {
    DEFAULT_DEV_SERVER_PORT
}

fn default_api_target() -> String {
    "http://localhost:8000".to_string()
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl DevServerConfig {
    /// Configured port when it is above 10000, otherwise the default port.
    pub fn effective_port(&self) -> u16 {
        if self.port > MIN_DEV_SERVER_PORT {
            self.port
        } else {
            tracing::warn!(
                target: "texton.config",
                port = self.port,
                fallback = DEFAULT_DEV_SERVER_PORT,
                "dev server port must be greater than {MIN_DEV_SERVER_PORT}, using default"
            );
            DEFAULT_DEV_SERVER_PORT
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_dev_host(),
            port: default_dev_port(),
            api_target: default_api_target(),
            static_dir: default_static_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
