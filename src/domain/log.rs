//! Log levels and records relayed from the Lightning library.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Severity of a log line, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Gossip,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Gossip,
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Gossip => "gossip",
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Position in [`LogLevel::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::invalid_input("log_level", format!("unknown level '{s}'")))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log line produced inside the Lightning library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub module_path: String,
    pub line: u32,
    pub message: String,
}

/// Where a relayed log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    /// The wrapped Lightning library.
    Library,
    /// This crate's own operation reporting.
    Node,
}

impl LogOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogOrigin::Library => "library",
            LogOrigin::Node => "node",
        }
    }
}

/// A log line as delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub origin: LogOrigin,
    pub level: LogLevel,
    pub message: String,
}

impl From<LogRecord> for LogEvent {
    fn from(record: LogRecord) -> Self {
        Self {
            origin: LogOrigin::Library,
            level: record.level,
            message: format!("{}:{} {}", record.module_path, record.line, record.message),
        }
    }
}
