//! Success tags reported alongside operation results.

use std::fmt;

use crate::domain::LogLevel;

/// Names which operation succeeded, for hosts that route replies by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuccessKind {
    ChainMonitorInit,
    KeysManagerInit,
    ConfigInit,
    NetworkGraphInit,
    ChannelManagerInit,
    FeesUpdated,
    LogLevelUpdated,
    SyncToTip,
    TxConfirmed,
    TxUnconfirmed,
    AddPeer,
    CloseChannel,
    PersistManager,
    PersistGraph,
    InvoiceDecode,
    InvoicePayment,
    InvoiceCreate,
    Version,
    NodeId,
    ListPeers,
    ListChannels,
    ListUsableChannels,
    ListMonitors,
    GraphNodes,
    GraphNode,
    GraphChannel,
}

impl SuccessKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChainMonitorInit => "chain_monitor_init_success",
            Self::KeysManagerInit => "keys_manager_init_success",
            Self::ConfigInit => "config_init_success",
            Self::NetworkGraphInit => "network_graph_init_success",
            Self::ChannelManagerInit => "channel_manager_init_success",
            Self::FeesUpdated => "fees_updated",
            Self::LogLevelUpdated => "log_level_updated",
            Self::SyncToTip => "sync_to_tip_success",
            Self::TxConfirmed => "tx_confirmed_success",
            Self::TxUnconfirmed => "tx_unconfirmed_success",
            Self::AddPeer => "add_peer_success",
            Self::CloseChannel => "close_channel_success",
            Self::PersistManager => "persist_manager_success",
            Self::PersistGraph => "persist_graph_success",
            Self::InvoiceDecode => "invoice_decode_success",
            Self::InvoicePayment => "invoice_payment_success",
            Self::InvoiceCreate => "invoice_create_success",
            Self::Version => "version",
            Self::NodeId => "node_id",
            Self::ListPeers => "list_peers",
            Self::ListChannels => "list_channels",
            Self::ListUsableChannels => "list_usable_channels",
            Self::ListMonitors => "list_monitors",
            Self::GraphNodes => "graph_nodes",
            Self::GraphNode => "graph_node",
            Self::GraphChannel => "graph_channel",
        }
    }

    /// Level of the node log line mirroring a success of this kind.
    ///
    /// Read-only queries are frequent and stay at debug.
    #[must_use]
    pub const fn log_level(self) -> LogLevel {
        match self {
            Self::Version
            | Self::NodeId
            | Self::ListPeers
            | Self::ListChannels
            | Self::ListUsableChannels
            | Self::ListMonitors
            | Self::GraphNodes
            | Self::GraphNode
            | Self::GraphChannel
            | Self::InvoiceDecode
            | Self::SyncToTip => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for SuccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
