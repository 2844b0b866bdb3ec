//! Callbacks the wrapped library invokes, from its own threads.
//!
//! One capability per trait. The adapters in `adapter::callback` implement
//! them by forwarding to the event bridge; none of them may fail the library
//! call that triggered it.

use bitcoin::{BlockHash, OutPoint, Script, ScriptBuf, Transaction, Txid};

use crate::domain::{LogRecord, ManagerEvent};

/// How urgently a transaction needs to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationTarget {
    HighPriority,
    Normal,
    Background,
}

pub trait FeeEstimator: Send + Sync {
    /// Fee rate in satoshis per 1000 weight units.
    fn sat_per_1000_weight(&self, target: ConfirmationTarget) -> u32;
}

pub trait Logger: Send + Sync {
    fn log(&self, record: LogRecord);
}

pub trait Broadcaster: Send + Sync {
    fn broadcast_transaction(&self, tx: &Transaction);
}

/// An output whose spends the chain monitor needs to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedOutput {
    pub block_hash: Option<BlockHash>,
    pub outpoint: OutPoint,
    pub script_pubkey: ScriptBuf,
}

/// Requests to watch the chain for relevant transactions.
pub trait Filter: Send + Sync {
    fn register_tx(&self, txid: &Txid, script_pubkey: &Script);

    fn register_output(&self, output: WatchedOutput);
}

/// Serialized state the host must store.
pub trait Persister: Send + Sync {
    fn persist_manager(&self, manager: &[u8]);

    fn persist_graph(&self, graph: &[u8]);

    /// First write of a new channel's monitor.
    fn persist_new_channel(&self, funding_txo: OutPoint, monitor: &[u8]);

    /// Rewrite of an existing channel's monitor.
    fn update_persisted_channel(&self, funding_txo: OutPoint, monitor: &[u8]);
}

/// Receives events from the channel manager's event queue.
pub trait EventHandler: Send + Sync {
    fn handle_event(&self, event: ManagerEvent);
}
