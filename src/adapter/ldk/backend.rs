//! [`LightningBackend`] on the Lightning Development Kit.
//!
//! The backend owns a small tokio runtime for peer connections and for the
//! loop that drains LDK's events into the node's event handler. Node
//! operations stay synchronous and must not be called from inside an async
//! task, since connecting to a peer blocks on that runtime.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use bitcoin::secp256k1::{PublicKey, Secp256k1};
use bitcoin::BlockHash;
use chrono::Utc;
use lightning::chain::channelmonitor::ChannelMonitor;
use lightning::chain::BestBlock;
use lightning::ln::channelmanager::ChainParameters;
use lightning::ln::peer_handler::{IgnoringMessageHandler, MessageHandler};
use lightning::routing::gossip::P2PGossipSync;
use lightning::routing::router::DefaultRouter;
use lightning::routing::scoring::{
    ProbabilisticScoringDecayParameters, ProbabilisticScoringFeeParameters,
};
use lightning::sign::{InMemorySigner, KeysManager};
use lightning::util::ser::ReadableArgs;
use parking_lot::Mutex;
use rand::RngCore;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::subsystem::{
    ChainMonitorHandle, GraphHandle, KeysHandle, ManagerHandle, PayerHandle, PeerHandle,
    ScorerHandle,
};
use super::{convert, types};
use crate::adapter::bolt11::{self, InboundPayment, MIN_FINAL_CLTV_EXPIRY_DELTA};
use crate::domain::{Invoice, Network};
use crate::port::{
    BackendError, ChainMonitor, ChainMonitorDeps, ChannelManager, ChannelManagerDeps,
    ChannelManagerParts, ChannelManagerSource, InvoiceRequest, KeysManager as _,
    LightningBackend, Logger, NetworkGraph,
};

/// Version of the LDK release this backend is built on.
pub const LDK_VERSION: &str = "0.0.125";

/// How often pending LDK events are drained without an external trigger.
const EVENT_INTERVAL: Duration = Duration::from_secs(1);

/// Event intervals between LDK timer ticks.
const TIMER_TICK_EVERY: u32 = 60;

/// The concrete LDK objects behind the handles given to the node.
#[derive(Default)]
struct Built {
    chain_monitor: Option<Arc<types::ChainMonitor>>,
    keys_manager: Option<Arc<KeysManager>>,
    network_graph: Option<Arc<types::NetworkGraph>>,
    channel_manager: Option<Arc<ManagerHandle>>,
}

pub struct LdkBackend {
    runtime: Runtime,
    built: Mutex<Built>,
}

impl LdkBackend {
    pub fn new() -> Result<Self, BackendError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("lnbridge-ldk")
            .enable_all()
            .build()
            .map_err(|e| BackendError::new(format!("cannot start LDK runtime: {e}")))?;
        Ok(Self {
            runtime,
            built: Mutex::new(Built::default()),
        })
    }

    fn built<T: Clone>(
        &self,
        pick: impl FnOnce(&Built) -> &Option<T>,
        what: &str,
    ) -> Result<T, BackendError> {
        pick(&self.built.lock())
            .clone()
            .ok_or_else(|| BackendError::new(format!("{what} was not built by this backend")))
    }

    fn spawn_event_loop(&self, manager: Arc<ManagerHandle>, peers: Arc<types::PeerManager>) {
        self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(EVENT_INTERVAL);
            let mut ticks = 0u32;
            loop {
                interval.tick().await;
                manager.process_events();
                peers.process_events();
                ticks = ticks.wrapping_add(1);
                if ticks % TIMER_TICK_EVERY == 0 {
                    manager.inner.timer_tick_occurred();
                    peers.timer_tick_occurred();
                }
            }
        });
    }
}

fn unix_now() -> Duration {
    let now = Utc::now();
    Duration::new(now.timestamp().unsigned_abs(), now.timestamp_subsec_nanos())
}

fn network_of(genesis_hash: &BlockHash) -> Result<Network, BackendError> {
    [Network::Mainnet, Network::Testnet, Network::Regtest]
        .into_iter()
        .find(|network| network.matches_genesis(genesis_hash))
        .ok_or_else(|| BackendError::new(format!("unknown genesis block {genesis_hash}")))
}

fn read_monitor(
    bytes: &[u8],
    keys: &KeysManager,
) -> Result<ChannelMonitor<InMemorySigner>, BackendError> {
    let (_, monitor) =
        <(BlockHash, ChannelMonitor<InMemorySigner>)>::read(&mut &bytes[..], (keys, keys))
            .map_err(|e| BackendError::new(format!("invalid channel monitor: {e}")))?;
    Ok(monitor)
}

impl LightningBackend for LdkBackend {
    fn version(&self) -> String {
        LDK_VERSION.to_owned()
    }

    fn build_chain_monitor(
        &self,
        deps: ChainMonitorDeps,
    ) -> Result<Arc<dyn ChainMonitor>, BackendError> {
        let chain_monitor = Arc::new(types::ChainMonitor::new(
            Some(deps.filter),
            deps.broadcaster,
            deps.logger,
            deps.fee_estimator,
            deps.persister,
        ));
        self.built.lock().chain_monitor = Some(Arc::clone(&chain_monitor));
        Ok(Arc::new(ChainMonitorHandle {
            inner: chain_monitor,
        }))
    }

    fn build_keys_manager(
        &self,
        seed: &[u8; 32],
        starting_time: Duration,
    ) -> Result<Arc<dyn crate::port::KeysManager>, BackendError> {
        let keys = Arc::new(KeysManager::new(
            seed,
            starting_time.as_secs(),
            starting_time.subsec_nanos(),
        ));
        let node_id = PublicKey::from_secret_key(&Secp256k1::new(), &keys.get_node_secret_key());
        self.built.lock().keys_manager = Some(keys);
        Ok(Arc::new(KeysHandle { node_id }))
    }

    fn build_network_graph(
        &self,
        genesis_hash: BlockHash,
        logger: Arc<dyn Logger>,
    ) -> Result<Arc<dyn NetworkGraph>, BackendError> {
        let network = network_of(&genesis_hash)?;
        let graph = Arc::new(types::NetworkGraph::new(network.to_bitcoin(), logger));
        self.built.lock().network_graph = Some(Arc::clone(&graph));
        Ok(Arc::new(GraphHandle {
            inner: graph,
            genesis_hash,
        }))
    }

    fn build_channel_manager(
        &self,
        deps: ChannelManagerDeps,
        source: ChannelManagerSource,
    ) -> Result<ChannelManagerParts, BackendError> {
        // Constructors below log through the host, which may call back in.
        let chain_monitor = self.built(|b| &b.chain_monitor, "chain monitor")?;
        let keys = self.built(|b| &b.keys_manager, "keys manager")?;
        let graph = self.built(|b| &b.network_graph, "network graph")?;

        let scorer = Arc::new(StdMutex::new(types::Scorer::new(
            ProbabilisticScoringDecayParameters::default(),
            Arc::clone(&graph),
            Arc::clone(&deps.logger),
        )));
        let router = Arc::new(DefaultRouter::new(
            Arc::clone(&graph),
            Arc::clone(&deps.logger),
            Arc::clone(&keys),
            Arc::clone(&scorer),
            ProbabilisticScoringFeeParameters::default(),
        ));
        let config = convert::user_config(&deps.user_config);
        let now = unix_now();

        let (manager, restored_monitors) = match source {
            ChannelManagerSource::Fresh {
                best_block_hash,
                best_block_height,
            } => {
                let params = ChainParameters {
                    network: deps.network.to_bitcoin(),
                    best_block: BestBlock::new(best_block_hash, best_block_height),
                };
                let manager = types::ChannelManager::new(
                    Arc::clone(&deps.fee_estimator),
                    Arc::clone(&chain_monitor),
                    Arc::clone(&deps.broadcaster),
                    router,
                    Arc::clone(&deps.logger),
                    Arc::clone(&keys),
                    Arc::clone(&keys),
                    Arc::clone(&keys),
                    config,
                    params,
                    now.as_secs() as u32,
                );
                (manager, Vec::new())
            }
            ChannelManagerSource::Restore {
                serialized_manager,
                channel_monitors,
            } => {
                let mut monitors = channel_monitors
                    .iter()
                    .map(|bytes| read_monitor(bytes, &keys))
                    .collect::<Result<Vec<_>, _>>()?;
                let args = types::ChannelManagerReadArgs::new(
                    Arc::clone(&keys),
                    Arc::clone(&keys),
                    Arc::clone(&keys),
                    Arc::clone(&deps.fee_estimator),
                    Arc::clone(&chain_monitor),
                    Arc::clone(&deps.broadcaster),
                    router,
                    Arc::clone(&deps.logger),
                    config,
                    monitors.iter_mut().collect(),
                );
                let (_, manager) =
                    <(BlockHash, types::ChannelManager)>::read(&mut &serialized_manager[..], args)
                        .map_err(|e| BackendError::new(format!("invalid channel manager: {e}")))?;
                info!(monitors = monitors.len(), "Channel manager restored");
                (manager, monitors)
            }
        };
        let manager = Arc::new(manager);

        let gossip: Arc<types::GossipSync> = Arc::new(P2PGossipSync::new(
            Arc::clone(&graph),
            None,
            Arc::clone(&deps.logger),
        ));
        let mut ephemeral = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ephemeral);
        let peer_manager = Arc::new(types::PeerManager::new(
            MessageHandler {
                chan_handler: Arc::clone(&manager),
                route_handler: gossip,
                onion_message_handler: IgnoringMessageHandler {},
                custom_message_handler: IgnoringMessageHandler {},
            },
            now.as_secs() as u32,
            &ephemeral,
            Arc::clone(&deps.logger),
            Arc::clone(&keys),
        ));

        let handle = Arc::new(ManagerHandle::new(
            manager,
            chain_monitor,
            restored_monitors,
            deps.event_handler,
            deps.persister,
        ));
        self.spawn_event_loop(Arc::clone(&handle), Arc::clone(&peer_manager));
        self.built.lock().channel_manager = Some(Arc::clone(&handle));
        debug!(node_id = %handle.inner.get_our_node_id(), "LDK channel manager built");

        Ok(ChannelManagerParts {
            channel_manager: handle.clone(),
            peer_handler: Arc::new(PeerHandle {
                peer_manager,
                runtime: self.runtime.handle().clone(),
            }),
            invoice_payer: Arc::new(PayerHandle { manager: handle }),
            scorer: Arc::new(ScorerHandle { _scorer: scorer }),
        })
    }

    fn parse_invoice(&self, text: &str) -> Result<Invoice, BackendError> {
        bolt11::decode(text)
    }

    fn create_invoice(
        &self,
        channel_manager: &dyn ChannelManager,
        keys_manager: &dyn crate::port::KeysManager,
        request: &InvoiceRequest,
    ) -> Result<Invoice, BackendError> {
        let manager = self.built(|b| &b.channel_manager, "channel manager")?;
        let keys = self.built(|b| &b.keys_manager, "keys manager")?;
        let node_id = manager.inner.get_our_node_id();
        if channel_manager.node_id() != node_id || keys_manager.node_id() != node_id {
            return Err(BackendError::new("subsystems belong to another backend"));
        }

        let expiry_secs = u32::try_from(request.expiry_secs)
            .map_err(|_| BackendError::new("invoice expiry out of range"))?;
        let (payment_hash, payment_secret) = manager
            .inner
            .create_inbound_payment(
                request.amount_msat,
                expiry_secs,
                Some(MIN_FINAL_CLTV_EXPIRY_DELTA),
            )
            .map_err(|()| BackendError::new("cannot register inbound payment"))?;

        // Unannounced channels are invisible to payers without a hint.
        let route_hints: Vec<_> = manager
            .inner
            .list_usable_channels()
            .iter()
            .filter(|channel| !channel.is_announced)
            .filter_map(convert::route_hint)
            .map(|hop| vec![hop])
            .collect();

        bolt11::sign(
            request,
            InboundPayment {
                payment_hash: payment_hash.0,
                payment_secret: payment_secret.0,
            },
            &route_hints,
            &keys.get_node_secret_key(),
            unix_now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fixtures;

    #[test]
    fn test_network_from_genesis() {
        let regtest = bitcoin::constants::genesis_block(bitcoin::Network::Regtest).block_hash();
        assert_eq!(network_of(&regtest).unwrap(), Network::Regtest);
        assert!(network_of(&fixtures::header(1).block_hash()).is_err());
    }

    #[test]
    fn test_subsystems_need_their_dependencies() {
        let backend = LdkBackend::new().unwrap();
        let missing = backend
            .built(|b| &b.keys_manager, "keys manager")
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            missing.as_deref(),
            Some("keys manager was not built by this backend")
        );
    }

    #[test]
    fn test_rejects_garbage_monitor() {
        let keys = KeysManager::new(&[1; 32], 0, 0);
        assert!(read_monitor(&[0xde, 0xad], &keys).is_err());
    }
}
