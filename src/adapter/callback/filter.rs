use std::sync::Arc;

use bitcoin::{Script, Txid};

use crate::application::EventBridge;
use crate::domain::Event;
use crate::port::{Filter, WatchedOutput};

/// Passes chain watch requests to the host's chain source.
pub struct FilterAdapter {
    bridge: Arc<EventBridge>,
}

impl FilterAdapter {
    #[must_use]
    pub fn new(bridge: Arc<EventBridge>) -> Self {
        Self { bridge }
    }
}

impl Filter for FilterAdapter {
    fn register_tx(&self, txid: &Txid, script_pubkey: &Script) {
        self.bridge.emit(Event::RegisterTx {
            txid: *txid,
            script_pubkey: script_pubkey.to_owned(),
        });
    }

    fn register_output(&self, output: WatchedOutput) {
        self.bridge.emit(Event::RegisterOutput {
            outpoint: output.outpoint,
            script_pubkey: output.script_pubkey,
            block_hash: output.block_hash,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{fixtures, recording::RecordingSubscriber};
    use bitcoin::{OutPoint, ScriptBuf};

    #[test]
    fn test_watch_requests_become_events() {
        let bridge = Arc::new(EventBridge::new());
        let recorder = Arc::new(RecordingSubscriber::new());
        bridge.set_subscriber(recorder.clone());
        let filter = FilterAdapter::new(bridge);

        let txid = fixtures::transaction(1_000).compute_txid();
        let script = ScriptBuf::from_bytes(vec![0x00, 0x14, 0xaa]);
        filter.register_tx(&txid, &script);
        filter.register_output(WatchedOutput {
            block_hash: None,
            outpoint: OutPoint { txid, vout: 3 },
            script_pubkey: script.clone(),
        });

        assert_eq!(recorder.names(), vec!["register_tx", "register_output"]);
        let payload = recorder.events()[1].payload();
        assert_eq!(payload["index"], 3);
        assert_eq!(payload["script_pubkey"], "0014aa");
        assert!(payload["block_hash"].is_null());
    }
}
