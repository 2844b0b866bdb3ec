//! Parsing of caller-supplied hex fields.
//!
//! Every failure is `InvalidInput` naming the field, unless noted.

use std::str::FromStr;

use bitcoin::block::Header;
use bitcoin::consensus;
use bitcoin::secp256k1::PublicKey;
use bitcoin::{BlockHash, Transaction, Txid};

use crate::error::{Error, Result};

pub(crate) fn bytes(field: &'static str, hex: &str) -> Result<Vec<u8>> {
    hex::decode(hex).map_err(|e| Error::invalid_input(field, e))
}

fn array32(field: &'static str, hex: &str) -> Result<[u8; 32]> {
    let bytes = bytes(field, hex)?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| Error::invalid_input(field, format!("expected 32 bytes, got {}", bytes.len())))
}

fn decode<T: consensus::Decodable>(field: &'static str, hex: &str) -> Result<T> {
    let bytes = bytes(field, hex)?;
    consensus::deserialize(&bytes).map_err(|e| Error::invalid_input(field, e))
}

/// Keys manager seed: exactly 32 bytes, `InvalidSeed` otherwise.
pub(crate) fn seed(hex: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex).map_err(|e| Error::InvalidSeed(e.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| Error::InvalidSeed(format!("expected 32 bytes, got {}", bytes.len())))
}

/// Consensus-encoded 80 byte block header.
pub(crate) fn header(hex: &str) -> Result<Header> {
    decode("header", hex)
}

/// Consensus-encoded transaction.
pub(crate) fn transaction(hex: &str) -> Result<Transaction> {
    decode("transaction", hex)
}

/// Transaction id in display (reversed) byte order.
pub(crate) fn txid(hex: &str) -> Result<Txid> {
    Txid::from_str(hex).map_err(|e| Error::invalid_input("txid", e))
}

/// Block hash in display (reversed) byte order.
pub(crate) fn block_hash(field: &'static str, hex: &str) -> Result<BlockHash> {
    BlockHash::from_str(hex).map_err(|e| Error::invalid_input(field, e))
}

pub(crate) fn pubkey(field: &'static str, hex: &str) -> Result<PublicKey> {
    PublicKey::from_str(hex).map_err(|e| Error::invalid_input(field, e))
}

pub(crate) fn channel_id(hex: &str) -> Result<[u8; 32]> {
    array32("channel_id", hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fixtures;
    use bitcoin::consensus::encode::serialize_hex;

    #[test]
    fn test_seed_length_is_exact() {
        assert!(seed(&"11".repeat(32)).is_ok());
        for bad in ["11".repeat(31), "11".repeat(33), String::new(), "zz".repeat(32)] {
            assert_eq!(seed(&bad).unwrap_err().code(), "invalid_seed_hex");
        }
    }

    #[test]
    fn test_header_round_trip() {
        let header = fixtures::header(1);
        assert_eq!(super::header(&serialize_hex(&header)).unwrap(), header);
        assert_eq!(super::header("00").unwrap_err().code(), "invalid_input");
    }

    #[test]
    fn test_transaction_rejects_garbage() {
        let err = transaction("not hex").unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "transaction", .. }));
    }

    #[test]
    fn test_txid_display_order() {
        let tx = fixtures::transaction(10);
        let txid = tx.compute_txid();
        assert_eq!(super::txid(&txid.to_string()).unwrap(), txid);
    }

    #[test]
    fn test_channel_id_length() {
        assert!(channel_id(&"ab".repeat(32)).is_ok());
        assert!(channel_id(&"ab".repeat(16)).is_err());
    }
}
