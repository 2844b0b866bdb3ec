use std::sync::Arc;

use crate::application::EventBridge;
use crate::domain::{Event, ManagerEvent};
use crate::port::EventHandler;

/// Relays channel manager events as `channel_manager_*` events.
pub struct LibraryEventHandler {
    bridge: Arc<EventBridge>,
}

impl LibraryEventHandler {
    #[must_use]
    pub fn new(bridge: Arc<EventBridge>) -> Self {
        Self { bridge }
    }
}

impl EventHandler for LibraryEventHandler {
    fn handle_event(&self, event: ManagerEvent) {
        self.bridge.emit(Event::Manager(event));
    }
}
