//! Connected peer projection.

use bitcoin::secp256k1::PublicKey;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerView {
    pub node_id: String,
}

impl From<&PublicKey> for PeerView {
    fn from(node_id: &PublicKey) -> Self {
        Self {
            node_id: node_id.to_string(),
        }
    }
}
