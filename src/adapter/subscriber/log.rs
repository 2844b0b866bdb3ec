use tracing::{debug, error, info, trace, warn};

use crate::domain::{Event, LogLevel};
use crate::port::Subscriber;

/// A subscriber that writes every event to `tracing`.
///
/// `log` events keep their level; everything else is logged at debug.
pub struct LogSubscriber;

impl Subscriber for LogSubscriber {
    fn on_event(&self, event: Event) -> anyhow::Result<()> {
        match &event {
            Event::Log(log) => {
                let origin = log.origin.as_str();
                match log.level {
                    LogLevel::Gossip | LogLevel::Trace => {
                        trace!(origin, message = %log.message, "Node log");
                    }
                    LogLevel::Debug => debug!(origin, message = %log.message, "Node log"),
                    LogLevel::Info => info!(origin, message = %log.message, "Node log"),
                    LogLevel::Warn => warn!(origin, message = %log.message, "Node log"),
                    LogLevel::Error => error!(origin, message = %log.message, "Node log"),
                }
            }
            other => debug!(event = other.name(), payload = %other.payload(), "Node event"),
        }
        Ok(())
    }
}
