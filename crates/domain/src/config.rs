//! Configuration structures
//!
//! Loading lives in `byte-infra`; these types only describe the shape and
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BASE_DELAY_MS, DEFAULT_JITTER, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::impl_domain_status_conversions;

/// Top-level configuration for both services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outbound API client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// `none`, `full`, or `equal`
    pub jitter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter: DEFAULT_JITTER.to_string(),
        }
    }
}

impl ClientSettings {
    /// `timeout_secs` as a duration.
    pub const fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `base_delay_ms` as a duration.
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// `max_delay_ms` as a duration.
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// API service listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: DEFAULT_SERVER_HOST.to_string(), port: DEFAULT_SERVER_PORT }
    }
}

impl ServerSettings {
    /// `host:port` suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

impl_domain_status_conversions!(LogFormat {
    Json => "json",
    Pretty => "pretty",
});

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::default() }
    }
}
