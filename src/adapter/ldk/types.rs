use std::sync::{Arc, Mutex};

use lightning::chain::chainmonitor;
use lightning::ln::peer_handler::{self, IgnoringMessageHandler};
use lightning::routing::gossip::{self, P2PGossipSync};
use lightning::routing::router::DefaultRouter;
use lightning::routing::scoring::{ProbabilisticScorer, ProbabilisticScoringFeeParameters};
use lightning::routing::utxo::UtxoLookup;
use lightning::sign::{InMemorySigner, KeysManager};
use lightning_net_tokio::SocketDescriptor;

use crate::port::{Broadcaster, FeeEstimator, Filter, Logger, Persister};

pub(super) type ChainMonitor = chainmonitor::ChainMonitor<
    InMemorySigner,
    Arc<dyn Filter>,
    Arc<dyn Broadcaster>,
    Arc<dyn FeeEstimator>,
    Arc<dyn Logger>,
    Arc<dyn Persister>,
>;

pub(super) type NetworkGraph = gossip::NetworkGraph<Arc<dyn Logger>>;

pub(super) type Scorer = ProbabilisticScorer<Arc<NetworkGraph>, Arc<dyn Logger>>;

pub(super) type Router = DefaultRouter<
    Arc<NetworkGraph>,
    Arc<dyn Logger>,
    Arc<KeysManager>,
    Arc<Mutex<Scorer>>,
    ProbabilisticScoringFeeParameters,
    Scorer,
>;

pub(super) type ChannelManager = lightning::ln::channelmanager::ChannelManager<
    Arc<ChainMonitor>,
    Arc<dyn Broadcaster>,
    Arc<KeysManager>,
    Arc<KeysManager>,
    Arc<KeysManager>,
    Arc<dyn FeeEstimator>,
    Arc<Router>,
    Arc<dyn Logger>,
>;

pub(super) type ChannelManagerReadArgs<'a> = lightning::ln::channelmanager::ChannelManagerReadArgs<
    'a,
    Arc<ChainMonitor>,
    Arc<dyn Broadcaster>,
    Arc<KeysManager>,
    Arc<KeysManager>,
    Arc<KeysManager>,
    Arc<dyn FeeEstimator>,
    Arc<Router>,
    Arc<dyn Logger>,
>;

pub(super) type GossipSync =
    P2PGossipSync<Arc<NetworkGraph>, Arc<dyn UtxoLookup + Send + Sync>, Arc<dyn Logger>>;

pub(super) type PeerManager = peer_handler::PeerManager<
    SocketDescriptor,
    Arc<ChannelManager>,
    Arc<GossipSync>,
    IgnoringMessageHandler,
    Arc<dyn Logger>,
    IgnoringMessageHandler,
    Arc<KeysManager>,
>;
