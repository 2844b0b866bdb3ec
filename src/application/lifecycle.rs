//! Ordered construction of the node's subsystems.
//!
//! ```text
//! fee estimator, logger, broadcaster, filter, persister  -> chain monitor
//! keys manager                                            (independent)
//! user config                                             (independent)
//! network graph                                           (independent)
//! chain monitor, keys manager, user config, network graph -> channel manager
//!                                                            + peer handler, invoice payer, scorer
//! ```
//!
//! Every init operation checks, in order: the target is still absent
//! (`already_init`), its dependencies are present (`init_<dependency>`, first
//! missing one in the order above), its input is valid. Only then does it
//! construct, and it stores handles only if construction succeeded.

use std::time::Duration;

use chrono::Utc;
use tracing::info;

use super::input;
use super::node::Node;
use super::state::NodeState;
use super::success::SuccessKind;
use crate::adapter::callback::FeeRates;
use crate::domain::{LogLevel, Network, Subsystem, UserConfig};
use crate::error::{Error, Result};
use crate::port::{ChannelManagerDeps, ChannelManagerSource};

/// Inputs of [`Node::init_channel_manager`], as hex text from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelManagerParams {
    /// `mainnet`, `testnet` or `regtest`.
    pub network: String,
    /// Serialized channel manager, required when restoring.
    pub serialized_manager: Option<String>,
    /// Serialized channel monitors. Any `Some`, even empty, selects restore.
    pub channel_monitors: Option<Vec<String>>,
    /// Chain tip of a fresh node, display byte order.
    pub best_block_hash: String,
    pub best_block_height: u32,
}

impl ChannelManagerParams {
    fn source(&self) -> Result<ChannelManagerSource> {
        match &self.channel_monitors {
            Some(monitors) => {
                let manager = self.serialized_manager.as_deref().ok_or_else(|| {
                    Error::invalid_input("serialized_manager", "required to restore a node")
                })?;
                Ok(ChannelManagerSource::Restore {
                    serialized_manager: input::bytes("serialized_manager", manager)?,
                    channel_monitors: monitors
                        .iter()
                        .map(|monitor| input::bytes("channel_monitors", monitor))
                        .collect::<Result<_>>()?,
                })
            }
            None => Ok(ChannelManagerSource::Fresh {
                best_block_hash: input::block_hash("best_block_hash", &self.best_block_hash)?,
                best_block_height: self.best_block_height,
            }),
        }
    }
}

fn now() -> Result<Duration> {
    let now = Utc::now();
    let secs = u64::try_from(now.timestamp())
        .map_err(|_| Error::Library(format!("system clock before Unix epoch: {now}")))?;
    Ok(Duration::new(secs, now.timestamp_subsec_nanos()))
}

impl Node {
    pub fn init_chain_monitor(&self) -> Result<()> {
        self.run(SuccessKind::ChainMonitorInit, || {
            self.initialize(Subsystem::ChainMonitor, |_| {
                let chain_monitor = self.backend.build_chain_monitor(self.chain_monitor_deps())?;
                Ok(move |state: &mut NodeState| {
                    state.chain_monitor = Some(chain_monitor);
                })
            })
        })
    }

    /// `seed_hex` must decode to exactly 32 bytes.
    pub fn init_keys_manager(&self, seed_hex: &str) -> Result<()> {
        self.run(SuccessKind::KeysManagerInit, || {
            self.initialize(Subsystem::KeysManager, |_| {
                let seed = input::seed(seed_hex)?;
                let keys_manager = self.backend.build_keys_manager(&seed, now()?)?;
                Ok(move |state: &mut NodeState| {
                    state.keys_manager = Some(keys_manager);
                })
            })
        })
    }

    pub fn init_config(&self, config: UserConfig) -> Result<()> {
        self.run(SuccessKind::ConfigInit, || {
            self.initialize(Subsystem::UserConfig, |_| {
                Ok(move |state: &mut NodeState| {
                    state.user_config = Some(config);
                })
            })
        })
    }

    /// `genesis_hash_hex` is the genesis block hash in display byte order.
    pub fn init_network_graph(&self, genesis_hash_hex: &str) -> Result<()> {
        self.run(SuccessKind::NetworkGraphInit, || {
            self.initialize(Subsystem::NetworkGraph, |_| {
                let genesis_hash = input::block_hash("genesis_hash", genesis_hash_hex)?;
                let network_graph = self
                    .backend
                    .build_network_graph(genesis_hash, self.log_relay.clone())?;
                Ok(move |state: &mut NodeState| {
                    state.network_graph = Some(network_graph);
                })
            })
        })
    }

    /// Build the channel manager with its peer handler, invoice payer and scorer.
    ///
    /// Restores from serialized state when `channel_monitors` is `Some`,
    /// finishing chain sync before the handles are stored; otherwise starts
    /// fresh at the given best block. Emits a `channel manager ready` node
    /// log on success.
    pub fn init_channel_manager(&self, params: &ChannelManagerParams) -> Result<()> {
        self.run(SuccessKind::ChannelManagerInit, || {
            self.initialize(Subsystem::ChannelManager, |state| {
                let chain_monitor = state.chain_monitor()?;
                let keys_manager = state.keys_manager()?;
                let user_config = state.user_config()?;
                let network_graph = state.network_graph()?;

                let network: Network = params.network.parse()?;
                let source = params.source()?;
                if !network.matches_genesis(&network_graph.genesis_hash()) {
                    return Err(Error::InvalidNetwork(format!(
                        "network graph genesis {} is not the {network} genesis block",
                        network_graph.genesis_hash()
                    )));
                }

                let restore = matches!(source, ChannelManagerSource::Restore { .. });
                let deps = ChannelManagerDeps {
                    chain_monitor,
                    keys_manager,
                    network_graph,
                    fee_estimator: self.fees.clone(),
                    logger: self.log_relay.clone(),
                    broadcaster: self.broadcaster.clone(),
                    persister: self.persister.clone(),
                    event_handler: self.event_handler.clone(),
                    user_config,
                    network,
                };
                let parts = self.backend.build_channel_manager(deps, source)?;
                if restore {
                    parts.channel_manager.complete_chain_sync()?;
                }
                info!(%network, restore, "Channel manager constructed");

                Ok(move |state: &mut NodeState| {
                    state.channel_manager = Some(parts.channel_manager);
                    state.peer_handler = Some(parts.peer_handler);
                    state.invoice_payer = Some(parts.invoice_payer);
                    state.scorer = Some(parts.scorer);
                    state.network = Some(network);
                })
            })?;
            self.bridge.node_log(LogLevel::Info, "channel manager ready");
            Ok(())
        })
    }

    /// Set the fee rates served to the library, in sat per 1000 weight.
    pub fn update_fees(&self, high: u32, normal: u32, low: u32) -> Result<()> {
        self.run(SuccessKind::FeesUpdated, || {
            self.fees.update(FeeRates { high, normal, low });
            Ok(())
        })
    }

    /// Switch relaying of one library log level on or off.
    pub fn set_log_level(&self, level: &str, active: bool) -> Result<()> {
        self.run(SuccessKind::LogLevelUpdated, || {
            let level: LogLevel = level.parse()?;
            self.log_relay.set_level(level, active);
            Ok(())
        })
    }
}
