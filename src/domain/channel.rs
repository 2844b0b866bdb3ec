//! Channel and route projections.

use bitcoin::secp256k1::PublicKey;
use bitcoin::OutPoint;
use serde::Serialize;

use super::amount::msat_to_sat;

/// Snapshot of one channel as reported by the channel manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetails {
    pub channel_id: [u8; 32],
    pub counterparty_node_id: PublicKey,
    pub funding_txo: Option<OutPoint>,
    pub short_channel_id: Option<u64>,
    pub channel_value_sats: u64,
    pub balance_msat: u64,
    pub outbound_capacity_msat: u64,
    pub inbound_capacity_msat: u64,
    pub user_channel_id: u128,
    pub confirmations_required: Option<u32>,
    pub force_close_spend_delay: Option<u16>,
    pub unspendable_punishment_reserve: Option<u64>,
    pub is_outbound: bool,
    pub is_channel_ready: bool,
    pub is_usable: bool,
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelView {
    pub channel_id: String,
    pub counterparty_node_id: String,
    pub funding_txid: Option<String>,
    pub funding_output_index: Option<u32>,
    pub short_channel_id: Option<u64>,
    pub channel_value_sats: u64,
    pub balance_sats: u64,
    pub outbound_capacity_sats: u64,
    pub inbound_capacity_sats: u64,
    /// Decimal string; u128 does not fit every host's number type.
    pub user_channel_id: String,
    pub confirmations_required: Option<u32>,
    pub force_close_spend_delay: Option<u16>,
    pub unspendable_punishment_reserve: Option<u64>,
    pub is_outbound: bool,
    pub is_channel_ready: bool,
    pub is_usable: bool,
    pub is_public: bool,
}

impl From<&ChannelDetails> for ChannelView {
    fn from(channel: &ChannelDetails) -> Self {
        Self {
            channel_id: hex::encode(channel.channel_id),
            counterparty_node_id: channel.counterparty_node_id.to_string(),
            funding_txid: channel.funding_txo.map(|txo| txo.txid.to_string()),
            funding_output_index: channel.funding_txo.map(|txo| txo.vout),
            short_channel_id: channel.short_channel_id,
            channel_value_sats: channel.channel_value_sats,
            balance_sats: msat_to_sat(channel.balance_msat),
            outbound_capacity_sats: msat_to_sat(channel.outbound_capacity_msat),
            inbound_capacity_sats: msat_to_sat(channel.inbound_capacity_msat),
            user_channel_id: channel.user_channel_id.to_string(),
            confirmations_required: channel.confirmations_required,
            force_close_spend_delay: channel.force_close_spend_delay,
            unspendable_punishment_reserve: channel.unspendable_punishment_reserve,
            is_outbound: channel.is_outbound,
            is_channel_ready: channel.is_channel_ready,
            is_usable: channel.is_usable,
            is_public: channel.is_public,
        }
    }
}

/// One hop of a payment path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHop {
    pub pubkey: PublicKey,
    pub short_channel_id: u64,
    pub fee_msat: u64,
    pub cltv_expiry_delta: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteHopView {
    pub pubkey: String,
    pub short_channel_id: u64,
    pub fee_sats: u64,
    pub cltv_expiry_delta: u32,
}

impl From<&RouteHop> for RouteHopView {
    fn from(hop: &RouteHop) -> Self {
        Self {
            pubkey: hop.pubkey.to_string(),
            short_channel_id: hop.short_channel_id,
            fee_sats: msat_to_sat(hop.fee_msat),
            cltv_expiry_delta: hop.cltv_expiry_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fixtures;

    #[test]
    fn test_channel_view_projection() {
        let mut channel = fixtures::usable_channel(fixtures::pubkey(3), 250_500);
        channel.user_channel_id = u128::MAX;
        let view = ChannelView::from(&channel);

        assert_eq!(view.outbound_capacity_sats, 250);
        assert_eq!(view.user_channel_id, u128::MAX.to_string());
        assert_eq!(view.counterparty_node_id, fixtures::pubkey(3).to_string());
        assert_eq!(view.channel_id.len(), 64);
        assert!(view.is_usable);
    }

    #[test]
    fn test_route_hop_view() {
        let hop = RouteHop {
            pubkey: fixtures::pubkey(4),
            short_channel_id: 7,
            fee_msat: 2_500,
            cltv_expiry_delta: 144,
        };
        assert_eq!(RouteHopView::from(&hop).fee_sats, 2);
    }
}
