//! Canonical inputs and a ready-to-use node.

use std::sync::Arc;

use bitcoin::block::Header;
use bitcoin::constants::genesis_block;
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use bitcoin::{
    absolute, transaction, Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut,
    Witness,
};

use super::backend::MemoryBackend;
use super::recording::RecordingSubscriber;
use crate::application::{ChannelManagerParams, Node};
use crate::domain::{ChannelDetails, UserConfig};

/// A valid 32 byte keys manager seed.
pub const SEED_HEX: &str = "0101010101010101010101010101010101010101010101010101010101010101";

/// Donation request from the BOLT 11 test vectors: mainnet, no amount,
/// payee `03e7156a...dd9ad`.
pub const BOLT11_DONATION: &str = "lnbc1pvjluezsp5zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zygspp5qqqsyqcyq5rqwzqfqqqsyqcyq5rqwzqfqqqsyqcyq5rqwzqfqypqdpl2pkx2ctnv5sxxmmwwd5kgetjypeh2ursdae8g6twvus8g6rfwvs8qun0dfjkxaq9qrsgq357wnc5r2ueh7ck6q93dj32dlqnls087fxdwk8qakdyafkq3yap9us6v52vjjsrvywa6rt52cm9r9zqt8r2t7mlcwspyetp5h2tztugp9lfyql";

/// Public key for the secret key with every byte set to `n`. `n` must not be 0.
pub fn pubkey(n: u8) -> PublicKey {
    let secret = SecretKey::from_slice(&[n; 32]).expect("non-zero secret key");
    PublicKey::from_secret_key(&Secp256k1::new(), &secret)
}

/// Regtest genesis block hash, display order.
pub fn regtest_genesis_hex() -> String {
    genesis_block(bitcoin::Network::Regtest).block_hash().to_string()
}

pub fn mainnet_genesis_hex() -> String {
    genesis_block(bitcoin::Network::Bitcoin).block_hash().to_string()
}

/// The regtest genesis header with its nonce replaced.
pub fn header(nonce: u32) -> Header {
    let mut header = genesis_block(bitcoin::Network::Regtest).header;
    header.nonce = nonce;
    header
}

/// A one-input, one-output transaction paying `value_sats`.
pub fn transaction(value_sats: u64) -> Transaction {
    Transaction {
        version: transaction::Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(value_sats),
            script_pubkey: ScriptBuf::from_bytes(vec![0x00, 0x14, 0x11, 0x22]),
        }],
    }
}

/// A ready, public channel with `outbound_msat` to spend.
pub fn usable_channel(counterparty: PublicKey, outbound_msat: u64) -> ChannelDetails {
    let funding = transaction(outbound_msat / 1000 + 10_000);
    ChannelDetails {
        channel_id: [counterparty.serialize()[1]; 32],
        counterparty_node_id: counterparty,
        funding_txo: Some(OutPoint {
            txid: funding.compute_txid(),
            vout: 0,
        }),
        short_channel_id: Some(u64::from(counterparty.serialize()[2]) << 40),
        channel_value_sats: outbound_msat / 1000 + 10_000,
        balance_msat: outbound_msat,
        outbound_capacity_msat: outbound_msat,
        inbound_capacity_msat: 10_000_000,
        user_channel_id: 1,
        confirmations_required: Some(3),
        force_close_spend_delay: Some(144),
        unspendable_punishment_reserve: Some(1_000),
        is_outbound: true,
        is_channel_ready: true,
        is_usable: true,
        is_public: true,
    }
}

/// Regtest parameters for a fresh channel manager at the genesis block.
pub fn fresh_params() -> ChannelManagerParams {
    ChannelManagerParams {
        network: "regtest".into(),
        serialized_manager: None,
        channel_monitors: None,
        best_block_hash: regtest_genesis_hex(),
        best_block_height: 0,
    }
}

/// Run every init operation up to the channel manager, on regtest.
pub fn init_all(node: &Node) {
    node.init_chain_monitor().expect("chain monitor");
    node.init_keys_manager(SEED_HEX).expect("keys manager");
    node.init_config(UserConfig::default()).expect("config");
    node.init_network_graph(&regtest_genesis_hex())
        .expect("network graph");
    node.init_channel_manager(&fresh_params())
        .expect("channel manager");
}

/// A fully initialised regtest node with a recording subscriber attached.
pub fn ready_node() -> (Node, Arc<MemoryBackend>, Arc<RecordingSubscriber>) {
    let backend = Arc::new(MemoryBackend::new());
    let node = Node::new(backend.clone());
    let recorder = Arc::new(RecordingSubscriber::new());
    node.set_subscriber(recorder.clone());
    init_all(&node);
    (node, backend, recorder)
}
