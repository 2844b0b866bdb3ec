use serde::Deserialize;

use crate::domain::LogLevel;

/// Which library log levels are relayed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogRelayConfig {
    pub gossip: bool,
    pub trace: bool,
    pub debug: bool,
    pub info: bool,
    pub warn: bool,
    pub error: bool,
}

impl Default for LogRelayConfig {
    fn default() -> Self {
        Self {
            gossip: false,
            trace: true,
            debug: true,
            info: true,
            warn: true,
            error: true,
        }
    }
}

impl LogRelayConfig {
    #[must_use]
    pub fn is_active(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Gossip => self.gossip,
            LogLevel::Trace => self.trace,
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
        }
    }

    #[must_use]
    pub fn active_levels(&self) -> Vec<LogLevel> {
        LogLevel::ALL
            .into_iter()
            .filter(|level| self.is_active(*level))
            .collect()
    }
}
