//! Single-subscriber event egress.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::domain::{Event, LogEvent, LogLevel, LogOrigin};
use crate::port::Subscriber;

/// Delivers events to at most one subscriber.
///
/// Delivery is synchronous on the emitting thread, in emit order for that
/// thread. Without a subscriber events are dropped; a new subscriber sees
/// only events emitted after it was attached. Emitting never fails: errors
/// and panics from the subscriber are logged and discarded.
#[derive(Default)]
pub struct EventBridge {
    subscriber: RwLock<Option<Arc<dyn Subscriber>>>,
}

impl EventBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current subscriber.
    pub fn set_subscriber(&self, subscriber: Arc<dyn Subscriber>) {
        *self.subscriber.write() = Some(subscriber);
    }

    /// Detach the current subscriber; later events are dropped.
    pub fn clear_subscriber(&self) {
        *self.subscriber.write() = None;
    }

    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.subscriber.read().is_some()
    }

    pub fn emit(&self, event: Event) {
        // Deliver outside the lock so a subscriber may replace itself.
        let Some(subscriber) = self.subscriber.read().clone() else {
            return;
        };

        let name = event.name();
        match panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(event = name, error = %e, "Subscriber failed"),
            Err(_) => warn!(event = name, "Subscriber panicked"),
        }
    }

    /// Emit a `log` event originating from the node itself.
    pub fn node_log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(Event::Log(LogEvent {
            origin: LogOrigin::Node,
            level,
            message: message.into(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::recording::{FailingSubscriber, RecordingSubscriber};

    fn event() -> Event {
        Event::PersistManager(vec![1, 2, 3])
    }

    #[test]
    fn test_emit_without_subscriber_is_dropped() {
        let bridge = EventBridge::new();
        bridge.emit(event());

        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());
        assert!(recorder.events().is_empty());

        bridge.emit(event());
        assert_eq!(recorder.names(), vec!["persist_manager"]);
    }

    #[test]
    fn test_replacement_routes_to_new_subscriber() {
        let bridge = EventBridge::new();
        let first = Arc::new(RecordingSubscriber::new());
        let second = Arc::new(RecordingSubscriber::new());

        bridge.set_subscriber(first.clone());
        bridge.emit(event());
        bridge.set_subscriber(second.clone());
        bridge.emit(event());

        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events().len(), 1);
    }

    #[test]
    fn test_clear_subscriber() {
        let bridge = EventBridge::new();
        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());
        assert!(bridge.has_subscriber());

        bridge.clear_subscriber();
        bridge.emit(event());

        assert!(!bridge.has_subscriber());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_subscriber_errors_are_swallowed() {
        let bridge = EventBridge::new();
        bridge.set_subscriber(Arc::new(FailingSubscriber::erroring()));
        bridge.emit(event());

        bridge.set_subscriber(Arc::new(FailingSubscriber::panicking()));
        bridge.emit(event());

        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());
        bridge.emit(event());
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn test_node_log() {
        let bridge = EventBridge::new();
        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());

        bridge.node_log(LogLevel::Info, "ready");

        let events = recorder.events();
        assert!(matches!(
            &events[0],
            Event::Log(LogEvent { origin: LogOrigin::Node, level: LogLevel::Info, message })
                if message == "ready"
        ));
    }
}
