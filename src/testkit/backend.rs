//! In-memory [`LightningBackend`] for tests.
//!
//! Subsystems keep their state in one shared [`MemoryBackend`], so a test can
//! keep a handle to the backend, script its behaviour, drive library
//! callbacks and inspect what the node forwarded.
//!
//! Payment requests are real BOLT 11, signed with the node key derived from
//! the seed.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bitcoin::block::Header;
use bitcoin::hashes::{sha256, Hash};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use bitcoin::{BlockHash, OutPoint, Script, Transaction, Txid};
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::adapter::bolt11::{self, InboundPayment};
use crate::domain::{
    ChannelDetails, ChannelInfo, Invoice, LogLevel, LogRecord, ManagerEvent, Network, NodeInfo,
    PayError, Subsystem, UserConfig,
};
use crate::port::{
    BackendError, ChainMonitor, ChainMonitorDeps, ChannelManager, ChannelManagerDeps,
    ChannelManagerParts, ChannelManagerSource, ConfirmationTarget, Confirm, EventHandler,
    InvoicePayer, InvoiceRequest, KeysManager, LightningBackend, Logger, NetworkGraph,
    PeerHandler, Scorer, WatchedOutput,
};

/// Library version reported by the in-memory backend.
pub const MEMORY_VERSION: &str = "memory-0.1";

/// A chain observation as received by one subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    BestBlock {
        target: Subsystem,
        height: u32,
    },
    Confirmed {
        target: Subsystem,
        positions: Vec<usize>,
        txids: Vec<Txid>,
        height: u32,
    },
    Unconfirmed {
        target: Subsystem,
        txid: Txid,
    },
}

#[derive(Default)]
struct Shared {
    build_counts: HashMap<Subsystem, u32>,
    build_failures: HashMap<Subsystem, String>,
    chain_failure: Option<(Subsystem, String)>,
    chain_calls: Vec<ChainCall>,
    channels: Vec<ChannelDetails>,
    peers: Vec<PublicKey>,
    refuse_connections: Option<String>,
    payment_results: VecDeque<Result<[u8; 32], PayError>>,
    fail_invoice_creation: Option<String>,
    graph_nodes: Vec<NodeInfo>,
    graph_channels: Vec<ChannelInfo>,
    manager_source: Option<ChannelManagerSource>,
    user_config: Option<UserConfig>,
    chain_syncs_completed: u32,
    node_secret: Option<SecretKey>,
    monitor_deps: Option<ChainMonitorDeps>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

/// Shared, scriptable state behind every in-memory subsystem.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Scripting
    // -----------------------------------------------------------------------

    /// Make the next build of `subsystem` fail with `message`.
    pub fn fail_next_build(&self, subsystem: Subsystem, message: &str) {
        self.shared
            .lock()
            .build_failures
            .insert(subsystem, message.to_owned());
    }

    /// Make every chain observation received by `target` fail.
    pub fn fail_chain_sync(&self, target: Subsystem, message: &str) {
        self.shared.lock().chain_failure = Some((target, message.to_owned()));
    }

    pub fn add_channel(&self, channel: ChannelDetails) {
        self.shared.lock().channels.push(channel);
    }

    pub fn refuse_connections(&self, message: &str) {
        self.shared.lock().refuse_connections = Some(message.to_owned());
    }

    /// Queue the outcome of the next payment attempt.
    ///
    /// Without a queued outcome a payment succeeds when a usable channel has
    /// enough outbound capacity and fails with a routing error otherwise.
    pub fn push_payment_result(&self, result: Result<[u8; 32], PayError>) {
        self.shared.lock().payment_results.push_back(result);
    }

    pub fn fail_invoice_creation(&self, message: &str) {
        self.shared.lock().fail_invoice_creation = Some(message.to_owned());
    }

    pub fn add_graph_node(&self, node: NodeInfo) {
        self.shared.lock().graph_nodes.push(node);
    }

    pub fn add_graph_channel(&self, channel: ChannelInfo) {
        self.shared.lock().graph_channels.push(channel);
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn build_count(&self, subsystem: Subsystem) -> u32 {
        self.shared
            .lock()
            .build_counts
            .get(&subsystem)
            .copied()
            .unwrap_or(0)
    }

    pub fn chain_calls(&self) -> Vec<ChainCall> {
        self.shared.lock().chain_calls.clone()
    }

    /// How the channel manager was last built.
    pub fn manager_source(&self) -> Option<ChannelManagerSource> {
        self.shared.lock().manager_source.clone()
    }

    pub fn user_config(&self) -> Option<UserConfig> {
        self.shared.lock().user_config
    }

    pub fn chain_syncs_completed(&self) -> u32 {
        self.shared.lock().chain_syncs_completed
    }

    // -----------------------------------------------------------------------
    // Driving library callbacks
    // -----------------------------------------------------------------------

    fn monitor_deps(&self) -> ChainMonitorDeps {
        self.shared
            .lock()
            .monitor_deps
            .clone()
            .expect("chain monitor not built")
    }

    /// Emit a library log line through the node's logger.
    pub fn log(&self, level: LogLevel, message: &str) {
        self.monitor_deps().logger.log(LogRecord {
            level,
            module_path: "memory::chain".into(),
            line: 1,
            message: message.to_owned(),
        });
    }

    pub fn broadcast(&self, tx: &Transaction) {
        self.monitor_deps().broadcaster.broadcast_transaction(tx);
    }

    pub fn watch_tx(&self, txid: &Txid, script_pubkey: &Script) {
        self.monitor_deps().filter.register_tx(txid, script_pubkey);
    }

    pub fn watch_output(&self, output: WatchedOutput) {
        self.monitor_deps().filter.register_output(output);
    }

    /// Fee rate the node currently serves for `target`.
    pub fn fee_rate(&self, target: ConfirmationTarget) -> u32 {
        self.monitor_deps().fee_estimator.sat_per_1000_weight(target)
    }

    /// Open `channel` and persist its first monitor, as the library would.
    pub fn open_channel(&self, channel: ChannelDetails) {
        let persister = self.monitor_deps().persister;
        if let Some(funding_txo) = channel.funding_txo {
            persister.persist_new_channel(funding_txo, &channel.channel_id);
        }
        self.add_channel(channel);
    }

    /// Persist a later monitor state for an open channel.
    pub fn update_channel_monitor(&self, funding_txo: OutPoint, monitor: &[u8]) {
        self.monitor_deps()
            .persister
            .update_persisted_channel(funding_txo, monitor);
    }

    /// Raise a channel manager event.
    pub fn manager_event(&self, event: ManagerEvent) {
        let handler = self
            .shared
            .lock()
            .event_handler
            .clone()
            .expect("channel manager not built");
        handler.handle_event(event);
    }

    // -----------------------------------------------------------------------

    fn start_build(&self, subsystem: Subsystem) -> Result<(), BackendError> {
        let mut shared = self.shared.lock();
        *shared.build_counts.entry(subsystem).or_default() += 1;
        match shared.build_failures.remove(&subsystem) {
            Some(message) => Err(BackendError::new(message)),
            None => Ok(()),
        }
    }

    fn record_chain_call(&self, call: ChainCall) -> Result<(), BackendError> {
        let mut shared = self.shared.lock();
        let target = match &call {
            ChainCall::BestBlock { target, .. }
            | ChainCall::Confirmed { target, .. }
            | ChainCall::Unconfirmed { target, .. } => *target,
        };
        if let Some((failing, message)) = &shared.chain_failure {
            if *failing == target {
                return Err(BackendError::new(message.clone()));
            }
        }
        shared.chain_calls.push(call);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subsystems
// ---------------------------------------------------------------------------

struct MemoryConfirm {
    backend: MemoryBackend,
    target: Subsystem,
}

impl Confirm for MemoryConfirm {
    fn transactions_confirmed(
        &self,
        _header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError> {
        self.backend.record_chain_call(ChainCall::Confirmed {
            target: self.target,
            positions: txdata.iter().map(|(position, _)| *position).collect(),
            txids: txdata.iter().map(|(_, tx)| tx.compute_txid()).collect(),
            height,
        })
    }

    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError> {
        self.backend.record_chain_call(ChainCall::Unconfirmed {
            target: self.target,
            txid: *txid,
        })
    }

    fn best_block_updated(&self, _header: &Header, height: u32) -> Result<(), BackendError> {
        self.backend.record_chain_call(ChainCall::BestBlock {
            target: self.target,
            height,
        })
    }
}

struct MemoryChainMonitor {
    confirm: MemoryConfirm,
}

impl Confirm for MemoryChainMonitor {
    fn transactions_confirmed(
        &self,
        header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError> {
        self.confirm.transactions_confirmed(header, txdata, height)
    }

    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError> {
        self.confirm.transaction_unconfirmed(txid)
    }

    fn best_block_updated(&self, header: &Header, height: u32) -> Result<(), BackendError> {
        self.confirm.best_block_updated(header, height)
    }
}

impl ChainMonitor for MemoryChainMonitor {
    fn monitored_funding_txos(&self) -> Vec<OutPoint> {
        self.confirm
            .backend
            .shared
            .lock()
            .channels
            .iter()
            .filter_map(|channel| channel.funding_txo)
            .collect()
    }
}

struct MemoryKeysManager {
    node_id: PublicKey,
}

impl KeysManager for MemoryKeysManager {
    fn node_id(&self) -> PublicKey {
        self.node_id
    }
}

struct MemoryNetworkGraph {
    backend: MemoryBackend,
    genesis_hash: BlockHash,
}

impl NetworkGraph for MemoryNetworkGraph {
    fn genesis_hash(&self) -> BlockHash {
        self.genesis_hash
    }

    fn nodes(&self) -> Vec<NodeInfo> {
        self.backend.shared.lock().graph_nodes.clone()
    }

    fn node(&self, node_id: &PublicKey) -> Option<NodeInfo> {
        self.nodes().into_iter().find(|node| node.node_id == *node_id)
    }

    fn channel(&self, short_channel_id: u64) -> Option<ChannelInfo> {
        self.backend
            .shared
            .lock()
            .graph_channels
            .iter()
            .find(|channel| channel.short_channel_id == short_channel_id)
            .cloned()
    }

    fn encode(&self) -> Vec<u8> {
        let shared = self.backend.shared.lock();
        let mut data = self.genesis_hash.to_byte_array().to_vec();
        data.extend_from_slice(&(shared.graph_nodes.len() as u32).to_be_bytes());
        data.extend_from_slice(&(shared.graph_channels.len() as u32).to_be_bytes());
        data
    }
}

/// What the in-memory channel manager serializes to.
#[derive(Serialize, Deserialize)]
struct ManagerSnapshot {
    node_id: String,
    network: Network,
}

struct MemoryChannelManager {
    confirm: MemoryConfirm,
    node_id: PublicKey,
    network: Network,
    event_handler: Arc<dyn EventHandler>,
}

impl Confirm for MemoryChannelManager {
    fn transactions_confirmed(
        &self,
        header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError> {
        self.confirm.transactions_confirmed(header, txdata, height)
    }

    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError> {
        self.confirm.transaction_unconfirmed(txid)
    }

    fn best_block_updated(&self, header: &Header, height: u32) -> Result<(), BackendError> {
        self.confirm.best_block_updated(header, height)
    }
}

impl ChannelManager for MemoryChannelManager {
    fn node_id(&self) -> PublicKey {
        self.node_id
    }

    fn list_channels(&self) -> Vec<ChannelDetails> {
        self.confirm.backend.shared.lock().channels.clone()
    }

    fn list_usable_channels(&self) -> Vec<ChannelDetails> {
        self.list_channels()
            .into_iter()
            .filter(|channel| channel.is_usable)
            .collect()
    }

    fn close_channel(
        &self,
        channel_id: &[u8; 32],
        counterparty: &PublicKey,
        force: bool,
    ) -> Result<(), BackendError> {
        let closed = {
            let mut shared = self.confirm.backend.shared.lock();
            let index = shared
                .channels
                .iter()
                .position(|channel| {
                    channel.channel_id == *channel_id
                        && channel.counterparty_node_id == *counterparty
                })
                .ok_or_else(|| BackendError::new("no such channel"))?;
            shared.channels.remove(index)
        };

        let reason = if force {
            "holder force closed"
        } else {
            "cooperative closure"
        };
        self.event_handler.handle_event(ManagerEvent::ChannelClosed {
            channel_id: closed.channel_id,
            user_channel_id: closed.user_channel_id,
            reason: reason.into(),
        });
        Ok(())
    }

    fn encode(&self) -> Vec<u8> {
        let snapshot = ManagerSnapshot {
            node_id: self.node_id.to_string(),
            network: self.network,
        };
        serde_json::to_vec(&snapshot).unwrap_or_default()
    }

    fn complete_chain_sync(&self) -> Result<(), BackendError> {
        self.confirm.backend.shared.lock().chain_syncs_completed += 1;
        Ok(())
    }
}

struct MemoryPeerHandler {
    backend: MemoryBackend,
}

impl PeerHandler for MemoryPeerHandler {
    fn connect(
        &self,
        _addr: SocketAddr,
        node_id: &PublicKey,
        _timeout: Duration,
    ) -> Result<(), BackendError> {
        let mut shared = self.backend.shared.lock();
        if let Some(message) = &shared.refuse_connections {
            return Err(BackendError::new(message.clone()));
        }
        if !shared.peers.contains(node_id) {
            shared.peers.push(*node_id);
        }
        Ok(())
    }

    fn peer_node_ids(&self) -> Vec<PublicKey> {
        self.backend.shared.lock().peers.clone()
    }
}

struct MemoryInvoicePayer {
    backend: MemoryBackend,
    event_handler: Arc<dyn EventHandler>,
}

impl MemoryInvoicePayer {
    fn route(&self, invoice: &Invoice) -> Result<[u8; 32], PayError> {
        let amount_msat = invoice
            .amount_msat
            .ok_or_else(|| PayError::Invoice("amount missing".into()))?;
        let shared = self.backend.shared.lock();
        shared
            .channels
            .iter()
            .find(|channel| channel.is_usable && channel.outbound_capacity_msat >= amount_msat)
            .map(|_| rand::random())
            .ok_or_else(|| PayError::Routing(format!("no route for {amount_msat} msat")))
    }
}

impl InvoicePayer for MemoryInvoicePayer {
    fn pay_invoice(&self, invoice: &Invoice) -> Result<[u8; 32], PayError> {
        let scripted = self.backend.shared.lock().payment_results.pop_front();
        let payment_id = match scripted {
            Some(result) => result?,
            None => self.route(invoice)?,
        };

        self.event_handler.handle_event(ManagerEvent::PaymentSent {
            payment_id: Some(payment_id),
            payment_preimage: rand::random(),
            payment_hash: invoice.payment_hash,
            fee_paid_msat: Some(0),
        });
        Ok(payment_id)
    }
}

struct MemoryScorer;

impl Scorer for MemoryScorer {}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

impl LightningBackend for MemoryBackend {
    fn version(&self) -> String {
        MEMORY_VERSION.to_owned()
    }

    fn build_chain_monitor(
        &self,
        deps: ChainMonitorDeps,
    ) -> Result<Arc<dyn ChainMonitor>, BackendError> {
        self.start_build(Subsystem::ChainMonitor)?;
        self.shared.lock().monitor_deps = Some(deps);
        Ok(Arc::new(MemoryChainMonitor {
            confirm: MemoryConfirm {
                backend: self.clone(),
                target: Subsystem::ChainMonitor,
            },
        }))
    }

    fn build_keys_manager(
        &self,
        seed: &[u8; 32],
        _starting_time: Duration,
    ) -> Result<Arc<dyn KeysManager>, BackendError> {
        self.start_build(Subsystem::KeysManager)?;
        let digest = sha256::Hash::hash(seed);
        let secret = SecretKey::from_slice(digest.as_byte_array())
            .map_err(|e| BackendError::new(e.to_string()))?;
        self.shared.lock().node_secret = Some(secret);
        Ok(Arc::new(MemoryKeysManager {
            node_id: PublicKey::from_secret_key(&Secp256k1::new(), &secret),
        }))
    }

    fn build_network_graph(
        &self,
        genesis_hash: BlockHash,
        logger: Arc<dyn Logger>,
    ) -> Result<Arc<dyn NetworkGraph>, BackendError> {
        self.start_build(Subsystem::NetworkGraph)?;
        logger.log(LogRecord {
            level: LogLevel::Info,
            module_path: "memory::graph".into(),
            line: 1,
            message: format!("network graph created for {genesis_hash}"),
        });
        Ok(Arc::new(MemoryNetworkGraph {
            backend: self.clone(),
            genesis_hash,
        }))
    }

    fn build_channel_manager(
        &self,
        deps: ChannelManagerDeps,
        source: ChannelManagerSource,
    ) -> Result<ChannelManagerParts, BackendError> {
        self.start_build(Subsystem::ChannelManager)?;
        let node_id = deps.keys_manager.node_id();

        if let ChannelManagerSource::Restore {
            serialized_manager, ..
        } = &source
        {
            let snapshot: ManagerSnapshot = serde_json::from_slice(serialized_manager)
                .map_err(|e| BackendError::new(format!("invalid channel manager: {e}")))?;
            if snapshot.node_id != node_id.to_string() || snapshot.network != deps.network {
                return Err(BackendError::new("channel manager belongs to another node"));
            }
        }

        {
            let mut shared = self.shared.lock();
            shared.manager_source = Some(source);
            shared.user_config = Some(deps.user_config);
            shared.event_handler = Some(Arc::clone(&deps.event_handler));
        }
        deps.logger.log(LogRecord {
            level: LogLevel::Info,
            module_path: "memory::channelmanager".into(),
            line: 1,
            message: format!("channel manager built for {node_id}"),
        });

        let channel_manager = Arc::new(MemoryChannelManager {
            confirm: MemoryConfirm {
                backend: self.clone(),
                target: Subsystem::ChannelManager,
            },
            node_id,
            network: deps.network,
            event_handler: Arc::clone(&deps.event_handler),
        });
        Ok(ChannelManagerParts {
            channel_manager,
            peer_handler: Arc::new(MemoryPeerHandler {
                backend: self.clone(),
            }),
            invoice_payer: Arc::new(MemoryInvoicePayer {
                backend: self.clone(),
                event_handler: deps.event_handler,
            }),
            scorer: Arc::new(MemoryScorer),
        })
    }

    fn parse_invoice(&self, text: &str) -> Result<Invoice, BackendError> {
        bolt11::decode(text)
    }

    fn create_invoice(
        &self,
        _channel_manager: &dyn ChannelManager,
        _keys_manager: &dyn KeysManager,
        request: &InvoiceRequest,
    ) -> Result<Invoice, BackendError> {
        let node_secret = {
            let shared = self.shared.lock();
            if let Some(message) = &shared.fail_invoice_creation {
                return Err(BackendError::new(message.clone()));
            }
            shared
                .node_secret
                .ok_or_else(|| BackendError::new("keys manager not built"))?
        };

        let preimage: [u8; 32] = rand::random();
        let inbound = InboundPayment {
            payment_hash: sha256::Hash::hash(&preimage).to_byte_array(),
            payment_secret: rand::random(),
        };
        let now = Utc::now();
        let timestamp =
            u64::try_from(now.timestamp()).map_err(|e| BackendError::new(e.to_string()))?;
        bolt11::sign(
            request,
            inbound,
            &[],
            &node_secret,
            Duration::from_secs(timestamp),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_build_failure_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next_build(Subsystem::KeysManager, "hsm offline");

        assert!(backend.build_keys_manager(&[1; 32], Duration::ZERO).is_err());
        assert!(backend.build_keys_manager(&[1; 32], Duration::ZERO).is_ok());
        assert_eq!(backend.build_count(Subsystem::KeysManager), 2);
    }
}
