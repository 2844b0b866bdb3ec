//! Subscribers that record or reject events.

use parking_lot::Mutex;

use crate::domain::{Event, LogOrigin};
use crate::port::Subscriber;

/// Keeps every event it receives, in order.
#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<Event>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(Event::name).collect()
    }

    /// Messages of `log` events the node itself emitted.
    pub fn node_logs(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Log(log) if log.origin == LogOrigin::Node => Some(log.message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Events other than `log`.
    pub fn non_log_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|event| !matches!(event, Event::Log(_)))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Subscriber for RecordingSubscriber {
    fn on_event(&self, event: Event) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// A subscriber that fails on every event.
pub struct FailingSubscriber {
    panic: bool,
}

impl FailingSubscriber {
    /// Returns an error for every event.
    pub fn erroring() -> Self {
        Self { panic: false }
    }

    /// Panics on every event.
    pub fn panicking() -> Self {
        Self { panic: true }
    }
}

impl Subscriber for FailingSubscriber {
    fn on_event(&self, event: Event) -> anyhow::Result<()> {
        if self.panic {
            panic!("subscriber panicked on {}", event.name());
        }
        anyhow::bail!("subscriber rejected {}", event.name())
    }
}
