use std::sync::Arc;

use bitcoin::OutPoint;

use crate::application::EventBridge;
use crate::domain::Event;
use crate::port::Persister;

/// Forwards serialized state to host storage, one event per write.
pub struct PersisterAdapter {
    bridge: Arc<EventBridge>,
}

impl PersisterAdapter {
    #[must_use]
    pub fn new(bridge: Arc<EventBridge>) -> Self {
        Self { bridge }
    }
}

impl Persister for PersisterAdapter {
    fn persist_manager(&self, manager: &[u8]) {
        self.bridge.emit(Event::PersistManager(manager.to_vec()));
    }

    fn persist_graph(&self, graph: &[u8]) {
        self.bridge.emit(Event::PersistGraph(graph.to_vec()));
    }

    fn persist_new_channel(&self, funding_txo: OutPoint, monitor: &[u8]) {
        self.bridge.emit(Event::PersistNewChannel {
            funding_txo,
            monitor: monitor.to_vec(),
        });
    }

    fn update_persisted_channel(&self, funding_txo: OutPoint, monitor: &[u8]) {
        self.bridge.emit(Event::UpdatePersistedChannel {
            funding_txo,
            monitor: monitor.to_vec(),
        });
    }
}
