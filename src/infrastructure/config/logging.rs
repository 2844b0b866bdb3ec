//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`.
    pub format: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber for this configuration.
    ///
    /// `RUST_LOG` overrides the configured level. Fails if a global
    /// subscriber is already installed, so a host that sets up its own
    /// logging can skip this or ignore the error.
    pub fn init(&self) -> Result<(), ConfigError> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let installed = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).finish().try_init(),
            _ => fmt().with_env_filter(filter).finish().try_init(),
        };
        installed.map_err(ConfigError::Logging)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
