//! Library log relay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::EventBridge;
use crate::domain::{Event, LogEvent, LogLevel, LogRecord};
use crate::port::Logger;

/// Forwards library log records of active levels as `log` events.
///
/// Each level is switched independently; there is no threshold.
pub struct LogRelay {
    bridge: Arc<EventBridge>,
    active: [AtomicBool; LogLevel::ALL.len()],
}

impl LogRelay {
    /// A relay with every level active.
    #[must_use]
    pub fn new(bridge: Arc<EventBridge>) -> Self {
        Self {
            bridge,
            active: std::array::from_fn(|_| AtomicBool::new(true)),
        }
    }

    pub fn set_level(&self, level: LogLevel, active: bool) {
        self.active[level.index()].store(active, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_active(&self, level: LogLevel) -> bool {
        self.active[level.index()].load(Ordering::Relaxed)
    }
}

impl Logger for LogRelay {
    fn log(&self, record: LogRecord) {
        if self.is_active(record.level) {
            self.bridge.emit(Event::Log(LogEvent::from(record)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::recording::RecordingSubscriber;

    fn record(level: LogLevel) -> LogRecord {
        LogRecord {
            level,
            module_path: "lightning::chain".into(),
            line: 7,
            message: "tick".into(),
        }
    }

    #[test]
    fn test_inactive_levels_are_filtered() {
        let bridge = Arc::new(EventBridge::new());
        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());

        let relay = LogRelay::new(bridge);
        relay.set_level(LogLevel::Gossip, false);
        relay.log(record(LogLevel::Gossip));
        relay.log(record(LogLevel::Error));

        assert!(!relay.is_active(LogLevel::Gossip));
        assert_eq!(recorder.names(), vec!["log"]);
    }

    #[test]
    fn test_reactivate_level() {
        let bridge = Arc::new(EventBridge::new());
        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());

        let relay = LogRelay::new(bridge);
        relay.set_level(LogLevel::Debug, false);
        relay.set_level(LogLevel::Debug, true);
        relay.log(record(LogLevel::Debug));

        assert_eq!(recorder.events().len(), 1);
    }
}
