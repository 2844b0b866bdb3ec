//! Subsystems whose handles the node lifecycle owns.

use std::fmt;

/// A component of the wrapped Lightning node.
///
/// Each subsystem handle moves from absent to present at most once per
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    FeeEstimator,
    Logger,
    Broadcaster,
    Persister,
    Filter,
    ChainMonitor,
    KeysManager,
    UserConfig,
    NetworkGraph,
    ChannelManager,
    PeerHandler,
    InvoicePayer,
    Scorer,
}

impl Subsystem {
    /// Snake-case name of the subsystem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Subsystem::FeeEstimator => "fee_estimator",
            Subsystem::Logger => "logger",
            Subsystem::Broadcaster => "broadcaster",
            Subsystem::Persister => "persister",
            Subsystem::Filter => "filter",
            Subsystem::ChainMonitor => "chain_monitor",
            Subsystem::KeysManager => "keys_manager",
            Subsystem::UserConfig => "user_config",
            Subsystem::NetworkGraph => "network_graph",
            Subsystem::ChannelManager => "channel_manager",
            Subsystem::PeerHandler => "peer_handler",
            Subsystem::InvoicePayer => "invoice_payer",
            Subsystem::Scorer => "scorer",
        }
    }

    /// Error code reported when an operation needs this subsystem and it is absent.
    #[must_use]
    pub const fn init_code(self) -> &'static str {
        match self {
            Subsystem::FeeEstimator => "init_fee_estimator",
            Subsystem::Logger => "init_logger",
            Subsystem::Broadcaster => "init_broadcaster",
            Subsystem::Persister => "init_persister",
            Subsystem::Filter => "init_filter",
            Subsystem::ChainMonitor => "init_chain_monitor",
            Subsystem::KeysManager => "init_keys_manager",
            Subsystem::UserConfig => "init_user_config",
            Subsystem::NetworkGraph => "init_network_graph",
            Subsystem::ChannelManager => "init_channel_manager",
            Subsystem::PeerHandler => "init_peer_handler",
            Subsystem::InvoicePayer => "init_invoice_payer",
            Subsystem::Scorer => "init_scorer",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_code_matches_name() {
        for subsystem in [
            Subsystem::ChainMonitor,
            Subsystem::KeysManager,
            Subsystem::UserConfig,
            Subsystem::NetworkGraph,
            Subsystem::ChannelManager,
            Subsystem::PeerHandler,
            Subsystem::InvoicePayer,
        ] {
            assert_eq!(
                subsystem.init_code(),
                format!("init_{}", subsystem.as_str())
            );
        }
    }
}
