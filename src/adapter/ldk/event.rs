//! LDK events as the node's [`ManagerEvent`]s.

use lightning::events::{Event, FundingInfo, PaymentPurpose};
use lightning::routing::router::Path;
use lightning::util::ser::Writeable;

use crate::domain::{ManagerEvent, RouteHop};

/// The host-facing form of `event`, if the host is told about it.
///
/// Events the node handles on its own (forwarding, claiming) map to `None`.
pub(super) fn translate(event: &Event) -> Option<ManagerEvent> {
    let translated = match event {
        Event::FundingGenerationReady {
            temporary_channel_id,
            counterparty_node_id,
            channel_value_satoshis,
            output_script,
            user_channel_id,
        } => ManagerEvent::FundingGenerationReady {
            temporary_channel_id: temporary_channel_id.0,
            counterparty_node_id: *counterparty_node_id,
            channel_value_sats: *channel_value_satoshis,
            output_script: output_script.clone(),
            user_channel_id: *user_channel_id,
        },
        Event::PaymentClaimed {
            payment_hash,
            amount_msat,
            purpose,
            ..
        } => ManagerEvent::PaymentReceived {
            payment_hash: payment_hash.0,
            amount_msat: *amount_msat,
            payment_preimage: purpose.preimage().map(|preimage| preimage.0),
            payment_secret: match purpose {
                PaymentPurpose::Bolt11InvoicePayment { payment_secret, .. } => {
                    Some(payment_secret.0)
                }
                _ => None,
            },
        },
        Event::PaymentSent {
            payment_id,
            payment_preimage,
            payment_hash,
            fee_paid_msat,
        } => ManagerEvent::PaymentSent {
            payment_id: payment_id.map(|id| id.0),
            payment_preimage: payment_preimage.0,
            payment_hash: payment_hash.0,
            fee_paid_msat: *fee_paid_msat,
        },
        Event::OpenChannelRequest {
            temporary_channel_id,
            counterparty_node_id,
            funding_satoshis,
            push_msat,
            ..
        } => ManagerEvent::OpenChannelRequest {
            temporary_channel_id: temporary_channel_id.0,
            counterparty_node_id: *counterparty_node_id,
            funding_sats: *funding_satoshis,
            push_msat: *push_msat,
        },
        Event::PaymentPathSuccessful {
            payment_id,
            payment_hash,
            path,
        } => ManagerEvent::PaymentPathSuccessful {
            payment_id: payment_id.0,
            payment_hash: payment_hash.map(|hash| hash.0),
            path: hops(path),
        },
        Event::PaymentPathFailed {
            payment_id,
            payment_hash,
            payment_failed_permanently,
            path,
            short_channel_id,
            ..
        } => ManagerEvent::PaymentPathFailed {
            payment_id: payment_id.map(|id| id.0),
            payment_hash: payment_hash.0,
            payment_failed_permanently: *payment_failed_permanently,
            short_channel_id: *short_channel_id,
            path: hops(path),
        },
        Event::PaymentFailed {
            payment_id,
            payment_hash,
            ..
        } => ManagerEvent::PaymentFailed {
            payment_id: payment_id.0,
            payment_hash: payment_hash.map(|hash| hash.0),
        },
        Event::SpendableOutputs { outputs, .. } => ManagerEvent::SpendableOutputs {
            outputs: outputs.iter().map(Writeable::encode).collect(),
        },
        Event::ChannelClosed {
            channel_id,
            user_channel_id,
            reason,
            ..
        } => ManagerEvent::ChannelClosed {
            channel_id: channel_id.0,
            user_channel_id: *user_channel_id,
            reason: reason.to_string(),
        },
        Event::DiscardFunding {
            channel_id,
            funding_info: FundingInfo::Tx { transaction },
        } => ManagerEvent::DiscardFunding {
            channel_id: channel_id.0,
            transaction: transaction.clone(),
        },
        _ => return None,
    };
    Some(translated)
}

fn hops(path: &Path) -> Vec<RouteHop> {
    path.hops
        .iter()
        .map(|hop| RouteHop {
            pubkey: hop.pubkey,
            short_channel_id: hop.short_channel_id,
            fee_msat: hop.fee_msat,
            cltv_expiry_delta: hop.cltv_expiry_delta,
        })
        .collect()
}
