//! Subsystem handles held by a node.

use std::sync::Arc;

use crate::domain::{Network, Subsystem, UserConfig};
use crate::error::{Error, Result};
use crate::port::{
    ChainMonitor, ChannelManager, InvoicePayer, KeysManager, NetworkGraph, PeerHandler, Scorer,
};

/// Constructed subsystems, each absent until its init operation succeeds.
///
/// Cloning is cheap (handles are `Arc`s); operations work on a clone taken
/// under the read lock so they never see a half-written state.
#[derive(Clone, Default)]
pub(crate) struct NodeState {
    pub chain_monitor: Option<Arc<dyn ChainMonitor>>,
    pub keys_manager: Option<Arc<dyn KeysManager>>,
    pub user_config: Option<UserConfig>,
    pub network_graph: Option<Arc<dyn NetworkGraph>>,
    pub channel_manager: Option<Arc<dyn ChannelManager>>,
    pub peer_handler: Option<Arc<dyn PeerHandler>>,
    pub invoice_payer: Option<Arc<dyn InvoicePayer>>,
    pub scorer: Option<Arc<dyn Scorer>>,
    /// Selected together with the channel manager.
    pub network: Option<Network>,
}

fn require<T: Clone>(slot: &Option<T>, subsystem: Subsystem) -> Result<T> {
    slot.clone().ok_or(Error::NotInitialized(subsystem))
}

impl NodeState {
    /// Whether `subsystem` has a handle.
    ///
    /// The callback adapters are created with the node and always count as set.
    pub fn is_set(&self, subsystem: Subsystem) -> bool {
        match subsystem {
            Subsystem::FeeEstimator
            | Subsystem::Logger
            | Subsystem::Broadcaster
            | Subsystem::Persister
            | Subsystem::Filter => true,
            Subsystem::ChainMonitor => self.chain_monitor.is_some(),
            Subsystem::KeysManager => self.keys_manager.is_some(),
            Subsystem::UserConfig => self.user_config.is_some(),
            Subsystem::NetworkGraph => self.network_graph.is_some(),
            Subsystem::ChannelManager => self.channel_manager.is_some(),
            Subsystem::PeerHandler => self.peer_handler.is_some(),
            Subsystem::InvoicePayer => self.invoice_payer.is_some(),
            Subsystem::Scorer => self.scorer.is_some(),
        }
    }

    pub fn chain_monitor(&self) -> Result<Arc<dyn ChainMonitor>> {
        require(&self.chain_monitor, Subsystem::ChainMonitor)
    }

    pub fn keys_manager(&self) -> Result<Arc<dyn KeysManager>> {
        require(&self.keys_manager, Subsystem::KeysManager)
    }

    pub fn user_config(&self) -> Result<UserConfig> {
        require(&self.user_config, Subsystem::UserConfig)
    }

    pub fn network_graph(&self) -> Result<Arc<dyn NetworkGraph>> {
        require(&self.network_graph, Subsystem::NetworkGraph)
    }

    pub fn channel_manager(&self) -> Result<Arc<dyn ChannelManager>> {
        require(&self.channel_manager, Subsystem::ChannelManager)
    }

    pub fn peer_handler(&self) -> Result<Arc<dyn PeerHandler>> {
        require(&self.peer_handler, Subsystem::PeerHandler)
    }

    pub fn invoice_payer(&self) -> Result<Arc<dyn InvoicePayer>> {
        require(&self.invoice_payer, Subsystem::InvoicePayer)
    }

    /// The selected network, present once the channel manager is.
    pub fn network(&self) -> Result<Network> {
        require(&self.network, Subsystem::ChannelManager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = NodeState::default();
        assert!(state.is_set(Subsystem::Logger));
        assert!(!state.is_set(Subsystem::ChannelManager));
        assert_eq!(
            state.channel_manager().err().map(|e| e.code()),
            Some("init_channel_manager")
        );
        assert_eq!(state.network().err().map(|e| e.code()), Some("init_channel_manager"));
    }

    #[test]
    fn test_user_config_is_copied_out() {
        let state = NodeState {
            user_config: Some(UserConfig::default()),
            ..NodeState::default()
        };
        assert_eq!(state.user_config().ok(), Some(UserConfig::default()));
    }
}
