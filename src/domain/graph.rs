//! Gossiped network graph projections.

use bitcoin::secp256k1::PublicKey;
use serde::Serialize;

use super::amount::msat_to_sat;

/// A node known from gossip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_id: PublicKey,
    pub alias: Option<String>,
    pub addresses: Vec<String>,
    pub channels: Vec<u64>,
    /// Timestamp of the last node announcement, if any was seen.
    pub last_update: Option<u32>,
}

/// Forwarding policy in one direction of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalInfo {
    pub enabled: bool,
    pub cltv_expiry_delta: u16,
    pub htlc_minimum_msat: u64,
    pub htlc_maximum_msat: u64,
    pub fee_base_msat: u32,
    pub fee_proportional_millionths: u32,
    pub last_update: u32,
}

/// A channel known from gossip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub short_channel_id: u64,
    pub node_one: PublicKey,
    pub node_two: PublicKey,
    pub capacity_sats: Option<u64>,
    pub one_to_two: Option<DirectionalInfo>,
    pub two_to_one: Option<DirectionalInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub node_id: String,
    pub alias: Option<String>,
    pub addresses: Vec<String>,
    pub channels: Vec<u64>,
    pub last_update: Option<u32>,
}

impl From<&NodeInfo> for NodeView {
    fn from(node: &NodeInfo) -> Self {
        Self {
            node_id: node.node_id.to_string(),
            alias: node.alias.clone(),
            addresses: node.addresses.clone(),
            channels: node.channels.clone(),
            last_update: node.last_update,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionalView {
    pub enabled: bool,
    pub cltv_expiry_delta: u16,
    pub htlc_minimum_sats: u64,
    pub htlc_maximum_sats: u64,
    pub fee_base_sats: u64,
    pub fee_proportional_millionths: u32,
    pub last_update: u32,
}

impl From<&DirectionalInfo> for DirectionalView {
    fn from(info: &DirectionalInfo) -> Self {
        Self {
            enabled: info.enabled,
            cltv_expiry_delta: info.cltv_expiry_delta,
            htlc_minimum_sats: msat_to_sat(info.htlc_minimum_msat),
            htlc_maximum_sats: msat_to_sat(info.htlc_maximum_msat),
            fee_base_sats: msat_to_sat(u64::from(info.fee_base_msat)),
            fee_proportional_millionths: info.fee_proportional_millionths,
            last_update: info.last_update,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfoView {
    pub short_channel_id: u64,
    pub node_one: String,
    pub node_two: String,
    pub capacity_sats: Option<u64>,
    pub one_to_two: Option<DirectionalView>,
    pub two_to_one: Option<DirectionalView>,
}

impl From<&ChannelInfo> for ChannelInfoView {
    fn from(channel: &ChannelInfo) -> Self {
        Self {
            short_channel_id: channel.short_channel_id,
            node_one: channel.node_one.to_string(),
            node_two: channel.node_two.to_string(),
            capacity_sats: channel.capacity_sats,
            one_to_two: channel.one_to_two.as_ref().map(DirectionalView::from),
            two_to_one: channel.two_to_one.as_ref().map(DirectionalView::from),
        }
    }
}
