//! Port implementations over the built LDK objects.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bitcoin::block::Header;
use bitcoin::secp256k1::PublicKey;
use bitcoin::{BlockHash, OutPoint, Transaction, Txid};
use lightning::chain::channelmonitor::ChannelMonitor;
use lightning::chain::{self, Watch};
use lightning::events::{Event, EventsProvider, ReplayEvent};
use lightning::ln::bolt11_payment::payment_parameters_from_invoice;
use lightning::ln::channelmanager::PaymentId;
use lightning::ln::channelmanager::Retry;
use lightning::ln::types::ChannelId;
use lightning::sign::InMemorySigner;
use lightning::util::ser::Writeable;
use lightning_invoice::Bolt11Invoice;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::types;
use super::{convert, event};
use crate::domain::{ChannelDetails, ChannelInfo, Invoice, NodeInfo, PayError};
use crate::port::{self, BackendError, Confirm, EventHandler, Persister};

/// Attempts LDK makes to route a payment before reporting it failed.
const PAYMENT_RETRIES: u32 = 3;

const HANDSHAKE_POLL: Duration = Duration::from_millis(50);

fn library_error(error: impl std::fmt::Debug) -> BackendError {
    BackendError::new(format!("{error:?}"))
}

pub(super) struct ChainMonitorHandle {
    pub(super) inner: Arc<types::ChainMonitor>,
}

impl Confirm for ChainMonitorHandle {
    fn transactions_confirmed(
        &self,
        header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError> {
        chain::Confirm::transactions_confirmed(&*self.inner, header, txdata, height);
        Ok(())
    }

    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError> {
        chain::Confirm::transaction_unconfirmed(&*self.inner, txid);
        Ok(())
    }

    fn best_block_updated(&self, header: &Header, height: u32) -> Result<(), BackendError> {
        chain::Confirm::best_block_updated(&*self.inner, header, height);
        Ok(())
    }
}

impl port::ChainMonitor for ChainMonitorHandle {
    fn monitored_funding_txos(&self) -> Vec<OutPoint> {
        self.inner
            .list_monitors()
            .into_iter()
            .map(|(funding_txo, _)| funding_txo.into_bitcoin_outpoint())
            .collect()
    }
}

pub(super) struct KeysHandle {
    pub(super) node_id: PublicKey,
}

impl port::KeysManager for KeysHandle {
    fn node_id(&self) -> PublicKey {
        self.node_id
    }
}

pub(super) struct GraphHandle {
    pub(super) inner: Arc<types::NetworkGraph>,
    pub(super) genesis_hash: BlockHash,
}

impl port::NetworkGraph for GraphHandle {
    fn genesis_hash(&self) -> BlockHash {
        self.genesis_hash
    }

    fn nodes(&self) -> Vec<NodeInfo> {
        self.inner
            .read_only()
            .nodes()
            .unordered_iter()
            .filter_map(|(node_id, node)| convert::node_info(node_id, node))
            .collect()
    }

    fn node(&self, node_id: &PublicKey) -> Option<NodeInfo> {
        let node_id = convert::graph_node_id(node_id);
        let graph = self.inner.read_only();
        graph
            .node(&node_id)
            .and_then(|node| convert::node_info(&node_id, node))
    }

    fn channel(&self, short_channel_id: u64) -> Option<ChannelInfo> {
        self.inner
            .read_only()
            .channel(short_channel_id)
            .and_then(|channel| convert::channel_info(short_channel_id, channel))
    }

    fn encode(&self) -> Vec<u8> {
        Writeable::encode(&*self.inner)
    }
}

/// The channel manager, and the event loop draining it into the host.
pub(super) struct ManagerHandle {
    pub(super) inner: Arc<types::ChannelManager>,
    chain_monitor: Arc<types::ChainMonitor>,
    restored_monitors: Mutex<Vec<ChannelMonitor<InMemorySigner>>>,
    event_handler: Arc<dyn EventHandler>,
    persister: Arc<dyn Persister>,
    // Events wait until restored monitors are handed to the chain monitor.
    ready: AtomicBool,
}

impl ManagerHandle {
    pub(super) fn new(
        inner: Arc<types::ChannelManager>,
        chain_monitor: Arc<types::ChainMonitor>,
        restored_monitors: Vec<ChannelMonitor<InMemorySigner>>,
        event_handler: Arc<dyn EventHandler>,
        persister: Arc<dyn Persister>,
    ) -> Self {
        let ready = restored_monitors.is_empty();
        Self {
            inner,
            chain_monitor,
            restored_monitors: Mutex::new(restored_monitors),
            event_handler,
            persister,
            ready: AtomicBool::new(ready),
        }
    }

    /// Drain pending monitor and manager events, then persist if needed.
    pub(super) fn process_events(&self) {
        if !self.ready.load(Ordering::Acquire) {
            return;
        }
        let handler = |event: Event| -> Result<(), ReplayEvent> {
            self.handle(event);
            Ok(())
        };
        self.chain_monitor.process_pending_events(&handler);
        self.inner.process_pending_events(&handler);

        if self.inner.get_and_clear_needs_persistence() {
            self.persister.persist_manager(&self.inner.encode());
        }
    }

    fn handle(&self, event: Event) {
        match &event {
            Event::PendingHTLCsForwardable { .. } => self.inner.process_pending_htlc_forwards(),
            Event::PaymentClaimable {
                payment_hash,
                purpose,
                ..
            } => match purpose.preimage() {
                Some(preimage) => self.inner.claim_funds(preimage),
                None => {
                    warn!(
                        payment_hash = %hex::encode(payment_hash.0),
                        "No preimage for claimable payment"
                    );
                    self.inner.fail_htlc_backwards(payment_hash);
                }
            },
            _ => {}
        }
        if let Some(translated) = event::translate(&event) {
            self.event_handler.handle_event(translated);
        }
    }

    fn after_chain_update(&self) -> Result<(), BackendError> {
        self.process_events();
        Ok(())
    }
}

impl Confirm for ManagerHandle {
    fn transactions_confirmed(
        &self,
        header: &Header,
        txdata: &[(usize, &Transaction)],
        height: u32,
    ) -> Result<(), BackendError> {
        chain::Confirm::transactions_confirmed(&*self.inner, header, txdata, height);
        self.after_chain_update()
    }

    fn transaction_unconfirmed(&self, txid: &Txid) -> Result<(), BackendError> {
        chain::Confirm::transaction_unconfirmed(&*self.inner, txid);
        self.after_chain_update()
    }

    fn best_block_updated(&self, header: &Header, height: u32) -> Result<(), BackendError> {
        chain::Confirm::best_block_updated(&*self.inner, header, height);
        self.after_chain_update()
    }
}

impl port::ChannelManager for ManagerHandle {
    fn node_id(&self) -> PublicKey {
        self.inner.get_our_node_id()
    }

    fn list_channels(&self) -> Vec<ChannelDetails> {
        self.inner
            .list_channels()
            .iter()
            .map(convert::channel_details)
            .collect()
    }

    fn list_usable_channels(&self) -> Vec<ChannelDetails> {
        self.inner
            .list_usable_channels()
            .iter()
            .map(convert::channel_details)
            .collect()
    }

    fn close_channel(
        &self,
        channel_id: &[u8; 32],
        counterparty: &PublicKey,
        force: bool,
    ) -> Result<(), BackendError> {
        let channel_id = ChannelId(*channel_id);
        if force {
            self.inner
                .force_close_broadcasting_latest_txn(
                    &channel_id,
                    counterparty,
                    "Channel force-closed by the node operator".to_owned(),
                )
                .map_err(library_error)?;
        } else {
            self.inner
                .close_channel(&channel_id, counterparty)
                .map_err(library_error)?;
        }
        self.process_events();
        Ok(())
    }

    fn encode(&self) -> Vec<u8> {
        Writeable::encode(&*self.inner)
    }

    fn complete_chain_sync(&self) -> Result<(), BackendError> {
        let monitors = std::mem::take(&mut *self.restored_monitors.lock());
        for monitor in monitors {
            let (funding_txo, _) = monitor.get_funding_txo();
            self.chain_monitor
                .watch_channel(funding_txo, monitor)
                .map_err(|()| {
                    BackendError::new(format!(
                        "channel monitor for {} rejected",
                        funding_txo.into_bitcoin_outpoint()
                    ))
                })?;
        }
        self.ready.store(true, Ordering::Release);
        self.process_events();
        Ok(())
    }
}

pub(super) struct PeerHandle {
    pub(super) peer_manager: Arc<types::PeerManager>,
    pub(super) runtime: Handle,
}

impl port::PeerHandler for PeerHandle {
    fn connect(
        &self,
        addr: SocketAddr,
        node_id: &PublicKey,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let peer_manager = Arc::clone(&self.peer_manager);
        let node_id = *node_id;
        self.runtime.block_on(async move {
            let connection = tokio::time::timeout(
                timeout,
                lightning_net_tokio::connect_outbound(Arc::clone(&peer_manager), node_id, addr),
            )
            .await
            .map_err(|_| BackendError::new(format!("timed out connecting to {addr}")))?
            .ok_or_else(|| BackendError::new(format!("could not connect to {addr}")))?;
            tokio::spawn(connection);

            tokio::time::timeout(timeout, async {
                while peer_manager.peer_by_node_id(&node_id).is_none() {
                    tokio::time::sleep(HANDSHAKE_POLL).await;
                }
            })
            .await
            .map_err(|_| BackendError::new(format!("handshake with {node_id} timed out")))?;
            debug!(%node_id, %addr, "Peer connected");
            Ok(())
        })
    }

    fn peer_node_ids(&self) -> Vec<PublicKey> {
        self.peer_manager
            .list_peers()
            .into_iter()
            .map(|peer| peer.counterparty_node_id)
            .collect()
    }
}

pub(super) struct PayerHandle {
    pub(super) manager: Arc<ManagerHandle>,
}

impl port::InvoicePayer for PayerHandle {
    fn pay_invoice(&self, invoice: &Invoice) -> Result<[u8; 32], PayError> {
        let invoice = Bolt11Invoice::from_str(&invoice.text)
            .map_err(|e| PayError::Invoice(e.to_string()))?;
        let (payment_hash, recipient_onion, route_params) =
            payment_parameters_from_invoice(&invoice)
                .map_err(|()| PayError::Invoice("invoice carries no amount".into()))?;
        let payment_id = PaymentId(payment_hash.0);

        self.manager
            .inner
            .send_payment(
                payment_hash,
                recipient_onion,
                payment_id,
                route_params,
                Retry::Attempts(PAYMENT_RETRIES),
            )
            .map_err(convert::pay_error)?;
        self.manager.process_events();
        Ok(payment_id.0)
    }
}

pub(super) struct ScorerHandle {
    pub(super) _scorer: Arc<std::sync::Mutex<types::Scorer>>,
}

impl port::Scorer for ScorerHandle {}
