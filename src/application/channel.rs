//! Peer connections, channel closes and on-demand persistence.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tracing::info;

use super::input;
use super::node::Node;
use super::success::SuccessKind;
use crate::error::{Error, Result};
use crate::port::Persister;

impl Node {
    /// Connect to a peer at an IP address literal.
    ///
    /// Host names are not resolved. Every failure, including bad input, is
    /// `add_peer_fail`.
    pub fn add_peer(
        &self,
        address: &str,
        port: u16,
        pubkey_hex: &str,
        timeout_ms: u64,
    ) -> Result<()> {
        self.run(SuccessKind::AddPeer, || {
            let peer_handler = self.snapshot().peer_handler()?;
            let ip: IpAddr = address
                .parse()
                .map_err(|e| Error::AddPeer(format!("address '{address}': {e}")))?;
            let node_id =
                input::pubkey("pubkey", pubkey_hex).map_err(|e| Error::AddPeer(e.to_string()))?;

            let addr = SocketAddr::new(ip, port);
            peer_handler
                .connect(addr, &node_id, Duration::from_millis(timeout_ms))
                .map_err(|e| Error::AddPeer(format!("{node_id}@{addr}: {e}")))?;
            info!(%node_id, %addr, "Peer connected");
            Ok(())
        })
    }

    /// Close a channel with `counterparty_hex`, unilaterally if `force`.
    pub fn close_channel(
        &self,
        channel_id_hex: &str,
        counterparty_hex: &str,
        force: bool,
    ) -> Result<()> {
        self.run(SuccessKind::CloseChannel, || {
            let channel_manager = self.snapshot().channel_manager()?;
            let channel_id =
                input::channel_id(channel_id_hex).map_err(|e| Error::CloseChannel(e.to_string()))?;
            let counterparty = input::pubkey("counterparty", counterparty_hex)
                .map_err(|e| Error::CloseChannel(e.to_string()))?;

            channel_manager
                .close_channel(&channel_id, &counterparty, force)
                .map_err(|e| Error::CloseChannel(e.to_string()))?;
            info!(channel_id = channel_id_hex, force, "Channel close requested");
            Ok(())
        })
    }

    /// Hand the serialized channel manager to the host as `persist_manager`.
    pub fn persist_manager(&self) -> Result<()> {
        self.run(SuccessKind::PersistManager, || {
            let channel_manager = self.snapshot().channel_manager()?;
            self.persister.persist_manager(&channel_manager.encode());
            Ok(())
        })
    }

    /// Hand the serialized network graph to the host as `persist_graph`.
    pub fn persist_graph(&self) -> Result<()> {
        self.run(SuccessKind::PersistGraph, || {
            let network_graph = self.snapshot().network_graph()?;
            self.persister.persist_graph(&network_graph.encode());
            Ok(())
        })
    }
}
