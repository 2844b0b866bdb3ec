use std::sync::Arc;

use bitcoin::Transaction;

use crate::application::EventBridge;
use crate::domain::Event;
use crate::port::Broadcaster;

/// Hands transactions to the host for network broadcast.
pub struct BroadcasterAdapter {
    bridge: Arc<EventBridge>,
}

impl BroadcasterAdapter {
    #[must_use]
    pub fn new(bridge: Arc<EventBridge>) -> Self {
        Self { bridge }
    }
}

impl Broadcaster for BroadcasterAdapter {
    fn broadcast_transaction(&self, tx: &Transaction) {
        self.bridge.emit(Event::BroadcastTransaction(tx.clone()));
    }
}
