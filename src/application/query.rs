//! Read-only queries, projected fresh on every call.

use serde::Serialize;

use super::input;
use super::node::Node;
use super::success::SuccessKind;
use crate::domain::{ChannelInfoView, ChannelView, NodeView, PeerView};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub crate_version: String,
    pub library_version: String,
}

impl Node {
    pub fn version(&self) -> Result<VersionInfo> {
        self.run(SuccessKind::Version, || {
            Ok(VersionInfo {
                crate_version: env!("CARGO_PKG_VERSION").to_owned(),
                library_version: self.backend.version(),
            })
        })
    }

    pub fn node_id(&self) -> Result<String> {
        self.run(SuccessKind::NodeId, || {
            Ok(self.snapshot().channel_manager()?.node_id().to_string())
        })
    }

    pub fn list_peers(&self) -> Result<Vec<PeerView>> {
        self.run(SuccessKind::ListPeers, || {
            let peer_handler = self.snapshot().peer_handler()?;
            Ok(peer_handler.peer_node_ids().iter().map(PeerView::from).collect())
        })
    }

    pub fn list_channels(&self) -> Result<Vec<ChannelView>> {
        self.run(SuccessKind::ListChannels, || {
            let channel_manager = self.snapshot().channel_manager()?;
            Ok(channel_manager.list_channels().iter().map(ChannelView::from).collect())
        })
    }

    /// Channels currently able to route a payment.
    pub fn list_usable_channels(&self) -> Result<Vec<ChannelView>> {
        self.run(SuccessKind::ListUsableChannels, || {
            let channel_manager = self.snapshot().channel_manager()?;
            Ok(channel_manager
                .list_usable_channels()
                .iter()
                .map(ChannelView::from)
                .collect())
        })
    }

    /// Funding outpoints watched by the chain monitor, as `<txid>_<vout>`.
    pub fn list_monitors(&self) -> Result<Vec<String>> {
        self.run(SuccessKind::ListMonitors, || {
            let chain_monitor = self.snapshot().chain_monitor()?;
            Ok(chain_monitor
                .monitored_funding_txos()
                .iter()
                .map(|txo| format!("{}_{}", txo.txid, txo.vout))
                .collect())
        })
    }

    pub fn graph_nodes(&self) -> Result<Vec<NodeView>> {
        self.run(SuccessKind::GraphNodes, || {
            let network_graph = self.snapshot().network_graph()?;
            Ok(network_graph.nodes().iter().map(NodeView::from).collect())
        })
    }

    /// A gossiped node, `None` if the graph does not know it.
    pub fn graph_node(&self, node_id_hex: &str) -> Result<Option<NodeView>> {
        self.run(SuccessKind::GraphNode, || {
            let network_graph = self.snapshot().network_graph()?;
            let node_id = input::pubkey("node_id", node_id_hex)?;
            Ok(network_graph.node(&node_id).as_ref().map(NodeView::from))
        })
    }

    /// A gossiped channel, `None` if the graph does not know it.
    pub fn graph_channel(&self, short_channel_id: u64) -> Result<Option<ChannelInfoView>> {
        self.run(SuccessKind::GraphChannel, || {
            let network_graph = self.snapshot().network_graph()?;
            Ok(network_graph
                .channel(short_channel_id)
                .as_ref()
                .map(ChannelInfoView::from))
        })
    }
}
