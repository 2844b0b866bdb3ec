//! Plain conversions between LDK types and the domain's.

use bitcoin::secp256k1::PublicKey;
use lightning::ln::channel_state::ChannelDetails as LdkChannelDetails;
use lightning::ln::channelmanager::RetryableSendFailure;
use lightning::routing::gossip::{
    ChannelInfo as LdkChannelInfo, ChannelUpdateInfo, NodeId, NodeInfo as LdkNodeInfo,
};
use lightning::util::config::UserConfig as LdkUserConfig;

use crate::domain::{
    ApiError, ChannelDetails, ChannelInfo, DirectionalInfo, NodeInfo, PayError, RouteHintHop,
    SendFailure, UserConfig,
};

pub(super) fn user_config(config: &UserConfig) -> LdkUserConfig {
    let mut ldk = LdkUserConfig::default();
    ldk.accept_inbound_channels = config.accept_inbound;
    ldk.manually_accept_inbound_channels = config.manually_accept_inbound;
    ldk.channel_handshake_config.announce_for_forwarding = config.announced_channels;
    ldk.channel_handshake_config.minimum_depth = config.min_handshake_depth;
    ldk
}

pub(super) fn channel_details(channel: &LdkChannelDetails) -> ChannelDetails {
    ChannelDetails {
        channel_id: channel.channel_id.0,
        counterparty_node_id: channel.counterparty.node_id,
        funding_txo: channel
            .funding_txo
            .map(|outpoint| outpoint.into_bitcoin_outpoint()),
        short_channel_id: channel.short_channel_id,
        channel_value_sats: channel.channel_value_satoshis,
        // LDK reports no single balance; what we could send now is the closest.
        balance_msat: channel.outbound_capacity_msat,
        outbound_capacity_msat: channel.outbound_capacity_msat,
        inbound_capacity_msat: channel.inbound_capacity_msat,
        user_channel_id: channel.user_channel_id,
        confirmations_required: channel.confirmations_required,
        force_close_spend_delay: channel.force_close_spend_delay,
        unspendable_punishment_reserve: channel.unspendable_punishment_reserve,
        is_outbound: channel.is_outbound,
        is_channel_ready: channel.is_channel_ready,
        is_usable: channel.is_usable,
        is_public: channel.is_announced,
    }
}

/// The hop a payer takes from `channel`'s counterparty to us.
///
/// `None` until the counterparty has sent its forwarding parameters.
pub(super) fn route_hint(channel: &LdkChannelDetails) -> Option<RouteHintHop> {
    let forwarding = channel.counterparty.forwarding_info.as_ref()?;
    Some(RouteHintHop {
        src_node_id: channel.counterparty.node_id,
        short_channel_id: channel.get_inbound_payment_scid()?,
        fee_base_msat: forwarding.fee_base_msat,
        fee_proportional_millionths: forwarding.fee_proportional_millionths,
        cltv_expiry_delta: forwarding.cltv_expiry_delta,
        htlc_minimum_msat: channel.inbound_htlc_minimum_msat,
        htlc_maximum_msat: channel.inbound_htlc_maximum_msat,
    })
}

pub(super) fn node_info(node_id: &NodeId, node: &LdkNodeInfo) -> Option<NodeInfo> {
    let announcement = node.announcement_info.as_ref();
    Some(NodeInfo {
        node_id: node_id.as_pubkey().ok()?,
        alias: announcement.map(|info| info.alias().to_string()),
        addresses: announcement
            .map(|info| info.addresses().iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        channels: node.channels.clone(),
        last_update: announcement.map(|info| info.last_update()),
    })
}

pub(super) fn channel_info(short_channel_id: u64, channel: &LdkChannelInfo) -> Option<ChannelInfo> {
    Some(ChannelInfo {
        short_channel_id,
        node_one: channel.node_one.as_pubkey().ok()?,
        node_two: channel.node_two.as_pubkey().ok()?,
        capacity_sats: channel.capacity_sats,
        one_to_two: channel.one_to_two.as_ref().map(directional),
        two_to_one: channel.two_to_one.as_ref().map(directional),
    })
}

fn directional(update: &ChannelUpdateInfo) -> DirectionalInfo {
    DirectionalInfo {
        enabled: update.enabled,
        cltv_expiry_delta: update.cltv_expiry_delta,
        htlc_minimum_msat: update.htlc_minimum_msat,
        htlc_maximum_msat: update.htlc_maximum_msat,
        fee_base_msat: update.fees.base_msat,
        fee_proportional_millionths: update.fees.proportional_millionths,
        last_update: update.last_update,
    }
}

pub(super) fn graph_node_id(node_id: &PublicKey) -> NodeId {
    NodeId::from_pubkey(node_id)
}

pub(super) fn pay_error(failure: RetryableSendFailure) -> PayError {
    match failure {
        RetryableSendFailure::PaymentExpired => PayError::Invoice("invoice expired".into()),
        RetryableSendFailure::RouteNotFound => PayError::Routing("no route found".into()),
        RetryableSendFailure::DuplicatePayment => PayError::Sending(SendFailure::DuplicatePayment),
        other => PayError::Sending(SendFailure::ParameterError(ApiError::ApiMisuse(format!(
            "{other:?}"
        )))),
    }
}
