//! Hex encodings of chain data, as a host would send them.

use bitcoin::consensus::encode::serialize_hex;

use lnbridge::testkit::fixtures;

pub fn header_hex(nonce: u32) -> String {
    serialize_hex(&fixtures::header(nonce))
}

pub fn transaction_hex(value_sats: u64) -> String {
    serialize_hex(&fixtures::transaction(value_sats))
}

pub fn txid_hex(value_sats: u64) -> String {
    fixtures::transaction(value_sats).compute_txid().to_string()
}
