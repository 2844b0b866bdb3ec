//! Chain observations forwarded to the channel manager and the chain monitor.
//!
//! Both must be present, checked in that order. Input is decoded before
//! anything is forwarded. A library failure in either forward is reported as
//! one `unknown_error`; the caller cannot tell whether the first forward
//! already happened.

use std::sync::Arc;

use super::input;
use super::node::Node;
use super::success::SuccessKind;
use crate::error::Result;
use crate::port::{ChainMonitor, ChannelManager};

impl Node {
    fn chain_targets(&self) -> Result<(Arc<dyn ChannelManager>, Arc<dyn ChainMonitor>)> {
        let state = self.snapshot();
        Ok((state.channel_manager()?, state.chain_monitor()?))
    }

    /// The best chain tip moved.
    pub fn sync_to_tip(&self, header_hex: &str, height: u32) -> Result<()> {
        self.run(SuccessKind::SyncToTip, || {
            let (channel_manager, chain_monitor) = self.chain_targets()?;
            let header = input::header(header_hex)?;

            channel_manager.best_block_updated(&header, height)?;
            chain_monitor.best_block_updated(&header, height)?;
            Ok(())
        })
    }

    /// One transaction at `position` in the block was confirmed.
    pub fn set_tx_confirmed(
        &self,
        header_hex: &str,
        tx_hex: &str,
        position: usize,
        height: u32,
    ) -> Result<()> {
        self.set_txs_confirmed(header_hex, &[(position, tx_hex)], height)
    }

    /// Transactions of one block were confirmed; `txs` order is kept.
    pub fn set_txs_confirmed(
        &self,
        header_hex: &str,
        txs: &[(usize, &str)],
        height: u32,
    ) -> Result<()> {
        self.run(SuccessKind::TxConfirmed, || {
            let (channel_manager, chain_monitor) = self.chain_targets()?;
            let header = input::header(header_hex)?;
            let decoded = txs
                .iter()
                .map(|(position, tx_hex)| Ok((*position, input::transaction(tx_hex)?)))
                .collect::<Result<Vec<_>>>()?;
            let txdata: Vec<_> = decoded.iter().map(|(position, tx)| (*position, tx)).collect();

            channel_manager.transactions_confirmed(&header, &txdata, height)?;
            chain_monitor.transactions_confirmed(&header, &txdata, height)?;
            Ok(())
        })
    }

    /// A confirmed transaction left the best chain.
    pub fn set_tx_unconfirmed(&self, txid_hex: &str) -> Result<()> {
        self.run(SuccessKind::TxUnconfirmed, || {
            let (channel_manager, chain_monitor) = self.chain_targets()?;
            let txid = input::txid(txid_hex)?;

            channel_manager.transaction_unconfirmed(&txid)?;
            chain_monitor.transaction_unconfirmed(&txid)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::consensus::encode::serialize_hex;

    use super::*;
    use crate::domain::Subsystem;
    use crate::testkit::backend::{ChainCall, MemoryBackend};
    use crate::testkit::fixtures;

    #[test]
    fn test_sync_forwards_to_manager_then_monitor() {
        let (node, backend, _) = fixtures::ready_node();
        node.sync_to_tip(&serialize_hex(&fixtures::header(7)), 101)
            .unwrap();

        assert_eq!(
            backend.chain_calls(),
            vec![
                ChainCall::BestBlock {
                    target: Subsystem::ChannelManager,
                    height: 101
                },
                ChainCall::BestBlock {
                    target: Subsystem::ChainMonitor,
                    height: 101
                },
            ]
        );
    }

    #[test]
    fn test_confirmed_keeps_caller_order() {
        let (node, backend, _) = fixtures::ready_node();
        let first = fixtures::transaction(5_000);
        let second = fixtures::transaction(6_000);
        let (first_hex, second_hex) = (serialize_hex(&first), serialize_hex(&second));

        node.set_txs_confirmed(
            &serialize_hex(&fixtures::header(1)),
            &[(9, first_hex.as_str()), (2, second_hex.as_str())],
            200,
        )
        .unwrap();

        let calls = backend.chain_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            ChainCall::Confirmed {
                target: Subsystem::ChannelManager,
                positions: vec![9, 2],
                txids: vec![first.compute_txid(), second.compute_txid()],
                height: 200,
            }
        );
    }

    #[test]
    fn test_manager_checked_before_monitor_and_input() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        let err = node.sync_to_tip("zz", 1).unwrap_err();
        assert_eq!(err.code(), "init_channel_manager");

        node.init_chain_monitor().unwrap();
        let err = node.set_tx_unconfirmed("zz").unwrap_err();
        assert_eq!(err.code(), "init_channel_manager");
    }

    #[test]
    fn test_bad_input_forwards_nothing() {
        let (node, backend, _) = fixtures::ready_node();

        let err = node.sync_to_tip("00ff", 1).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        let err = node
            .set_tx_confirmed(&serialize_hex(&fixtures::header(1)), "0102", 0, 1)
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(backend.chain_calls().is_empty());
    }

    #[test]
    fn test_library_failure_is_unknown_error() {
        let (node, backend, _) = fixtures::ready_node();
        backend.fail_chain_sync(Subsystem::ChainMonitor, "monitor update failed");

        let txid = fixtures::transaction(1).compute_txid().to_string();
        let err = node.set_tx_unconfirmed(&txid).unwrap_err();

        assert_eq!(err.code(), "unknown_error");
        assert_eq!(backend.chain_calls().len(), 1);
    }
}
