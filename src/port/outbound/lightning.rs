//! Lightning library port.
//!
//! These traits are the whole surface of the wrapped Lightning library as
//! seen from this crate. `adapter::ldk` implements them on LDK; `testkit`
//! provides an in-memory implementation.
//!
//! [`LightningBackend`] is the factory. Each `build_*` method constructs one
//! subsystem from the handles it depends on and returns a shared handle that
//! the node stores exactly once.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bitcoin::block::Header;
use bitcoin::secp256k1::PublicKey;
use bitcoin::{BlockHash, OutPoint, Transaction, Txid};
use thiserror::Error;

use super::callback::{Broadcaster, EventHandler, FeeEstimator, Filter, Logger, Persister};
use crate::domain::{
    ChannelDetails, ChannelInfo, Currency, Invoice, Network, NodeInfo, PayError, UserConfig,
};

/// Failure raised inside the wrapped library.
///
/// Carries only a message; the application layer decides the caller-facing code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Chain observations a subsystem must track.
///
/// Implemented by the chain monitor and the channel manager; the chain sync
/// operations forward every observation to both.
pub trait Confirm: Send + Sync {
    /// Transactions at the given positions of the block with `header` were confirmed.
    ///
    /// `txdata` keeps the order given by the caller.
    fn transactions_confirmed(
        &self,
        header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError>;

    /// A previously confirmed transaction was reorganised out of the chain.
    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError>;

    /// The best chain tip moved to `header` at `height`.
    fn best_block_updated(&self, header: &Header, height: u32) -> Result<(), BackendError>;
}

/// Watches the chain on behalf of every open channel.
pub trait ChainMonitor: Confirm {
    /// Funding outpoints of the channels currently monitored.
    fn monitored_funding_txos(&self) -> Vec<OutPoint>;
}

/// Node key material derived from the seed.
pub trait KeysManager: Send + Sync {
    fn node_id(&self) -> PublicKey;
}

/// Gossiped topology of the public network.
pub trait NetworkGraph: Send + Sync {
    /// Genesis block hash the graph was created for.
    fn genesis_hash(&self) -> BlockHash;

    fn nodes(&self) -> Vec<NodeInfo>;

    fn node(&self, node_id: &PublicKey) -> Option<NodeInfo>;

    fn channel(&self, short_channel_id: u64) -> Option<ChannelInfo>;

    /// Serialized graph, as handed to the persister.
    fn encode(&self) -> Vec<u8>;
}

/// Tracks the node's payment channels.
pub trait ChannelManager: Confirm {
    fn node_id(&self) -> PublicKey;

    fn list_channels(&self) -> Vec<ChannelDetails>;

    /// Channels currently able to send or forward a payment.
    fn list_usable_channels(&self) -> Vec<ChannelDetails>;

    /// Close a channel cooperatively, or broadcast the latest commitment if `force`.
    fn close_channel(
        &self,
        channel_id: &[u8; 32],
        counterparty: &PublicKey,
        force: bool,
    ) -> Result<(), BackendError>;

    /// Serialized manager, as handed to the persister.
    fn encode(&self) -> Vec<u8>;

    /// Finish reconciling a restored manager and its monitors with the chain.
    ///
    /// Called once after restore, before the manager is handed out.
    fn complete_chain_sync(&self) -> Result<(), BackendError>;
}

/// Transport connections to other Lightning nodes.
pub trait PeerHandler: Send + Sync {
    /// Connect to `node_id` at `addr`, giving up after `timeout`.
    fn connect(
        &self,
        addr: SocketAddr,
        node_id: &PublicKey,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    /// Node ids of peers with a completed handshake.
    fn peer_node_ids(&self) -> Vec<PublicKey>;
}

/// Routes and sends payments for decoded invoices.
pub trait InvoicePayer: Send + Sync {
    /// Start paying `invoice`; returns the payment id.
    ///
    /// Success means the payment was dispatched, not that it completed.
    /// Completion is reported through the channel manager's events.
    fn pay_invoice(&self, invoice: &Invoice) -> Result<[u8; 32], PayError>;
}

/// Route scorer consulted by the invoice payer.
///
/// Held by the node so it lives as long as the payer that borrows it.
pub trait Scorer: Send + Sync {}

/// Adapter handles every chain monitor is built with.
#[derive(Clone)]
pub struct ChainMonitorDeps {
    pub fee_estimator: Arc<dyn FeeEstimator>,
    pub logger: Arc<dyn Logger>,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub filter: Arc<dyn Filter>,
    pub persister: Arc<dyn Persister>,
}

/// Everything the channel manager and its companions are wired to.
#[derive(Clone)]
pub struct ChannelManagerDeps {
    pub chain_monitor: Arc<dyn ChainMonitor>,
    pub keys_manager: Arc<dyn KeysManager>,
    pub network_graph: Arc<dyn NetworkGraph>,
    pub fee_estimator: Arc<dyn FeeEstimator>,
    pub logger: Arc<dyn Logger>,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub persister: Arc<dyn Persister>,
    pub event_handler: Arc<dyn EventHandler>,
    pub user_config: UserConfig,
    pub network: Network,
}

/// How the channel manager comes into being.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelManagerSource {
    /// A new node starting at the given chain tip.
    Fresh {
        best_block_hash: BlockHash,
        best_block_height: u32,
    },
    /// A node reloaded from serialized manager and monitor state.
    Restore {
        serialized_manager: Vec<u8>,
        channel_monitors: Vec<Vec<u8>>,
    },
}

/// The channel manager together with the components wired around it.
#[derive(Clone)]
pub struct ChannelManagerParts {
    pub channel_manager: Arc<dyn ChannelManager>,
    pub peer_handler: Arc<dyn PeerHandler>,
    pub invoice_payer: Arc<dyn InvoicePayer>,
    pub scorer: Arc<dyn Scorer>,
}

/// Parameters of a new payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRequest {
    pub currency: Currency,
    pub amount_msat: Option<u64>,
    pub description: String,
    pub expiry_secs: u64,
}

/// Factory for the wrapped library's subsystems.
pub trait LightningBackend: Send + Sync {
    /// Version of the wrapped library.
    fn version(&self) -> String;

    fn build_chain_monitor(
        &self,
        deps: ChainMonitorDeps,
    ) -> Result<Arc<dyn ChainMonitor>, BackendError>;

    fn build_keys_manager(
        &self,
        seed: &[u8; 32],
        starting_time: Duration,
    ) -> Result<Arc<dyn KeysManager>, BackendError>;

    fn build_network_graph(
        &self,
        genesis_hash: BlockHash,
        logger: Arc<dyn Logger>,
    ) -> Result<Arc<dyn NetworkGraph>, BackendError>;

    fn build_channel_manager(
        &self,
        deps: ChannelManagerDeps,
        source: ChannelManagerSource,
    ) -> Result<ChannelManagerParts, BackendError>;

    /// Parse an encoded payment request.
    fn parse_invoice(&self, text: &str) -> Result<Invoice, BackendError>;

    /// Create and sign a payment request paying to this node.
    fn create_invoice(
        &self,
        channel_manager: &dyn ChannelManager,
        keys_manager: &dyn KeysManager,
        request: &InvoiceRequest,
    ) -> Result<Invoice, BackendError>;
}
