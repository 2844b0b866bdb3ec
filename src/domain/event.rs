//! Events delivered to the host through the event bridge.
//!
//! Each variant has a stable [`name`](Event::name) and a JSON
//! [`payload`](Event::payload). Byte fields are lowercase hex and amounts
//! are whole satoshis in the payload.

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::secp256k1::PublicKey;
use bitcoin::{BlockHash, OutPoint, ScriptBuf, Transaction, Txid};
use serde_json::{json, Value};

use super::amount::msat_to_sat;
use super::channel::{RouteHop, RouteHopView};
use super::log::LogEvent;

/// Events raised by the channel manager's own event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerEvent {
    FundingGenerationReady {
        temporary_channel_id: [u8; 32],
        counterparty_node_id: PublicKey,
        channel_value_sats: u64,
        output_script: ScriptBuf,
        user_channel_id: u128,
    },
    PaymentReceived {
        payment_hash: [u8; 32],
        amount_msat: u64,
        payment_preimage: Option<[u8; 32]>,
        payment_secret: Option<[u8; 32]>,
    },
    PaymentSent {
        payment_id: Option<[u8; 32]>,
        payment_preimage: [u8; 32],
        payment_hash: [u8; 32],
        fee_paid_msat: Option<u64>,
    },
    OpenChannelRequest {
        temporary_channel_id: [u8; 32],
        counterparty_node_id: PublicKey,
        funding_sats: u64,
        push_msat: u64,
    },
    PaymentPathSuccessful {
        payment_id: [u8; 32],
        payment_hash: Option<[u8; 32]>,
        path: Vec<RouteHop>,
    },
    PaymentPathFailed {
        payment_id: Option<[u8; 32]>,
        payment_hash: [u8; 32],
        payment_failed_permanently: bool,
        short_channel_id: Option<u64>,
        path: Vec<RouteHop>,
    },
    PaymentFailed {
        payment_id: [u8; 32],
        /// Absent when the payment failed before a payment hash was known.
        payment_hash: Option<[u8; 32]>,
    },
    SpendableOutputs {
        /// Serialized output descriptors.
        outputs: Vec<Vec<u8>>,
    },
    ChannelClosed {
        channel_id: [u8; 32],
        user_channel_id: u128,
        reason: String,
    },
    DiscardFunding {
        channel_id: [u8; 32],
        transaction: Transaction,
    },
}

impl ManagerEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ManagerEvent::FundingGenerationReady { .. } => {
                "channel_manager_funding_generation_ready"
            }
            ManagerEvent::PaymentReceived { .. } => "channel_manager_payment_received",
            ManagerEvent::PaymentSent { .. } => "channel_manager_payment_sent",
            ManagerEvent::OpenChannelRequest { .. } => "channel_manager_open_channel_request",
            ManagerEvent::PaymentPathSuccessful { .. } => {
                "channel_manager_payment_path_successful"
            }
            ManagerEvent::PaymentPathFailed { .. } => "channel_manager_payment_path_failed",
            ManagerEvent::PaymentFailed { .. } => "channel_manager_payment_failed",
            ManagerEvent::SpendableOutputs { .. } => "channel_manager_spendable_outputs",
            ManagerEvent::ChannelClosed { .. } => "channel_manager_channel_closed",
            ManagerEvent::DiscardFunding { .. } => "channel_manager_discard_funding",
        }
    }

    fn payload(&self) -> Value {
        match self {
            ManagerEvent::FundingGenerationReady {
                temporary_channel_id,
                counterparty_node_id,
                channel_value_sats,
                output_script,
                user_channel_id,
            } => json!({
                "temp_channel_id": hex::encode(temporary_channel_id),
                "counterparty_node_id": counterparty_node_id.to_string(),
                "value_satoshis": channel_value_sats,
                "output_script": hex::encode(output_script.as_bytes()),
                "user_channel_id": user_channel_id.to_string(),
            }),
            ManagerEvent::PaymentReceived {
                payment_hash,
                amount_msat,
                payment_preimage,
                payment_secret,
            } => json!({
                "payment_hash": hex::encode(payment_hash),
                "amount_sat": msat_to_sat(*amount_msat),
                "payment_preimage": payment_preimage.map(hex::encode),
                "payment_secret": payment_secret.map(hex::encode),
            }),
            ManagerEvent::PaymentSent {
                payment_id,
                payment_preimage,
                payment_hash,
                fee_paid_msat,
            } => json!({
                "payment_id": payment_id.map(hex::encode),
                "payment_preimage": hex::encode(payment_preimage),
                "payment_hash": hex::encode(payment_hash),
                "fee_paid_sat": fee_paid_msat.map(msat_to_sat),
            }),
            ManagerEvent::OpenChannelRequest {
                temporary_channel_id,
                counterparty_node_id,
                funding_sats,
                push_msat,
            } => json!({
                "temp_channel_id": hex::encode(temporary_channel_id),
                "counterparty_node_id": counterparty_node_id.to_string(),
                "funding_satoshis": funding_sats,
                "push_sat": msat_to_sat(*push_msat),
            }),
            ManagerEvent::PaymentPathSuccessful {
                payment_id,
                payment_hash,
                path,
            } => json!({
                "payment_id": hex::encode(payment_id),
                "payment_hash": payment_hash.map(hex::encode),
                "path": path_payload(path),
            }),
            ManagerEvent::PaymentPathFailed {
                payment_id,
                payment_hash,
                payment_failed_permanently,
                short_channel_id,
                path,
            } => json!({
                "payment_id": payment_id.map(hex::encode),
                "payment_hash": hex::encode(payment_hash),
                "payment_failed_permanently": payment_failed_permanently,
                "short_channel_id": short_channel_id,
                "path": path_payload(path),
            }),
            ManagerEvent::PaymentFailed {
                payment_id,
                payment_hash,
            } => json!({
                "payment_id": hex::encode(payment_id),
                "payment_hash": payment_hash.map(hex::encode),
            }),
            ManagerEvent::SpendableOutputs { outputs } => json!({
                "outputs": outputs.iter().map(hex::encode).collect::<Vec<_>>(),
            }),
            ManagerEvent::ChannelClosed {
                channel_id,
                user_channel_id,
                reason,
            } => json!({
                "channel_id": hex::encode(channel_id),
                "user_channel_id": user_channel_id.to_string(),
                "reason": reason,
            }),
            ManagerEvent::DiscardFunding {
                channel_id,
                transaction,
            } => json!({
                "channel_id": hex::encode(channel_id),
                "tx": serialize_hex(transaction),
            }),
        }
    }
}

fn path_payload(path: &[RouteHop]) -> Value {
    json!(path.iter().map(RouteHopView::from).collect::<Vec<_>>())
}

/// A notification for the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Log(LogEvent),
    /// The chain monitor wants a transaction watched.
    RegisterTx {
        txid: Txid,
        script_pubkey: ScriptBuf,
    },
    /// The chain monitor wants spends of an output watched.
    RegisterOutput {
        outpoint: OutPoint,
        script_pubkey: ScriptBuf,
        block_hash: Option<BlockHash>,
    },
    BroadcastTransaction(Transaction),
    PersistManager(Vec<u8>),
    PersistNewChannel {
        funding_txo: OutPoint,
        monitor: Vec<u8>,
    },
    PersistGraph(Vec<u8>),
    UpdatePersistedChannel {
        funding_txo: OutPoint,
        monitor: Vec<u8>,
    },
    Manager(ManagerEvent),
}

impl Event {
    /// Stable event name for named-event transports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::Log(_) => "log",
            Event::RegisterTx { .. } => "register_tx",
            Event::RegisterOutput { .. } => "register_output",
            Event::BroadcastTransaction(_) => "broadcast_transaction",
            Event::PersistManager(_) => "persist_manager",
            Event::PersistNewChannel { .. } => "persist_new_channel",
            Event::PersistGraph(_) => "persist_graph",
            Event::UpdatePersistedChannel { .. } => "update_persisted_channel",
            Event::Manager(event) => event.name(),
        }
    }

    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Event::Log(log) => json!({
                "origin": log.origin,
                "level": log.level,
                "message": log.message,
            }),
            Event::RegisterTx {
                txid,
                script_pubkey,
            } => json!({
                "txid": txid.to_string(),
                "script_pubkey": hex::encode(script_pubkey.as_bytes()),
            }),
            Event::RegisterOutput {
                outpoint,
                script_pubkey,
                block_hash,
            } => json!({
                "txid": outpoint.txid.to_string(),
                "index": outpoint.vout,
                "script_pubkey": hex::encode(script_pubkey.as_bytes()),
                "block_hash": block_hash.map(|hash| hash.to_string()),
            }),
            Event::BroadcastTransaction(tx) => json!({
                "txid": tx.compute_txid().to_string(),
                "tx": serialize_hex(tx),
            }),
            Event::PersistManager(data) | Event::PersistGraph(data) => json!({
                "data": hex::encode(data),
            }),
            Event::PersistNewChannel {
                funding_txo,
                monitor,
            }
            | Event::UpdatePersistedChannel {
                funding_txo,
                monitor,
            } => json!({
                "id": format!("{}_{}", funding_txo.txid, funding_txo.vout),
                "data": hex::encode(monitor),
            }),
            Event::Manager(event) => event.payload(),
        }
    }
}
