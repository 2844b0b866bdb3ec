//! Payment requests and their caller-facing projection.

use bitcoin::secp256k1::PublicKey;
use serde::Serialize;

use super::amount::msat_to_sat;
use super::network::Network;

/// One hop of a private route hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHintHop {
    pub src_node_id: PublicKey,
    pub short_channel_id: u64,
    pub fee_base_msat: u32,
    pub fee_proportional_millionths: u32,
    pub cltv_expiry_delta: u16,
    pub htlc_minimum_msat: Option<u64>,
    pub htlc_maximum_msat: Option<u64>,
}

/// A parsed payment request, in the library's native units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Encoded form, as given to or produced by the library.
    pub text: String,
    pub network: Network,
    pub amount_msat: Option<u64>,
    pub description: Option<String>,
    /// Creation time, seconds since the Unix epoch.
    pub timestamp: u64,
    pub expiry_secs: u64,
    pub min_final_cltv_expiry_delta: u64,
    pub route_hints: Vec<Vec<RouteHintHop>>,
    pub payee_pubkey: PublicKey,
    pub payment_hash: [u8; 32],
    pub payment_secret: Option<[u8; 32]>,
    pub features: Option<Vec<u8>>,
}

impl Invoice {
    /// Absolute expiry time, seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.timestamp.saturating_add(self.expiry_secs)
    }

    #[must_use]
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        now_secs >= self.expires_at()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteHintHopView {
    pub src_node_id: String,
    pub short_channel_id: u64,
    pub fee_base_msat: u32,
    pub fee_proportional_millionths: u32,
    pub cltv_expiry_delta: u16,
    pub htlc_minimum_sats: Option<u64>,
    pub htlc_maximum_sats: Option<u64>,
}

impl From<&RouteHintHop> for RouteHintHopView {
    fn from(hop: &RouteHintHop) -> Self {
        Self {
            src_node_id: hop.src_node_id.to_string(),
            short_channel_id: hop.short_channel_id,
            fee_base_msat: hop.fee_base_msat,
            fee_proportional_millionths: hop.fee_proportional_millionths,
            cltv_expiry_delta: hop.cltv_expiry_delta,
            htlc_minimum_sats: hop.htlc_minimum_msat.map(msat_to_sat),
            htlc_maximum_sats: hop.htlc_maximum_msat.map(msat_to_sat),
        }
    }
}

/// Caller-facing invoice: whole satoshis, lowercase hex, absent fields stay absent.
///
/// Depends only on the invoice itself, so projecting the same invoice twice
/// gives identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub to_str: String,
    pub currency: Network,
    pub amount_sats: Option<u64>,
    pub description: Option<String>,
    pub timestamp: u64,
    pub expiry_time: u64,
    pub expires_at: u64,
    pub min_final_cltv_expiry: u64,
    pub route_hints: Vec<Vec<RouteHintHopView>>,
    pub payee_pub_key: String,
    pub payment_hash: String,
    pub payment_secret: Option<String>,
    pub features: Option<String>,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            to_str: invoice.text.clone(),
            currency: invoice.network,
            amount_sats: invoice.amount_msat.map(msat_to_sat),
            description: invoice.description.clone(),
            timestamp: invoice.timestamp,
            expiry_time: invoice.expiry_secs,
            expires_at: invoice.expires_at(),
            min_final_cltv_expiry: invoice.min_final_cltv_expiry_delta,
            route_hints: invoice
                .route_hints
                .iter()
                .map(|hint| hint.iter().map(RouteHintHopView::from).collect())
                .collect(),
            payee_pub_key: invoice.payee_pubkey.to_string(),
            payment_hash: hex::encode(invoice.payment_hash),
            payment_secret: invoice.payment_secret.map(hex::encode),
            features: invoice.features.as_ref().map(hex::encode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fixtures;

    fn invoice(amount_msat: Option<u64>) -> Invoice {
        Invoice {
            text: "lnbcrt1deadbeef".into(),
            network: Network::Regtest,
            amount_msat,
            description: None,
            timestamp: 1_700_000_000,
            expiry_secs: 3600,
            min_final_cltv_expiry_delta: 24,
            route_hints: vec![vec![RouteHintHop {
                src_node_id: fixtures::pubkey(2),
                short_channel_id: 42,
                fee_base_msat: 1000,
                fee_proportional_millionths: 1,
                cltv_expiry_delta: 40,
                htlc_minimum_msat: Some(1500),
                htlc_maximum_msat: None,
            }]],
            payee_pubkey: fixtures::pubkey(1),
            payment_hash: [0xab; 32],
            payment_secret: None,
            features: Some(vec![0x02, 0x42]),
        }
    }

    #[test]
    fn test_view_truncates_amount() {
        let view = InvoiceView::from(&invoice(Some(1_999)));
        assert_eq!(view.amount_sats, Some(1));
        assert_eq!(view.route_hints[0][0].htlc_minimum_sats, Some(1));
    }

    #[test]
    fn test_view_keeps_absent_fields_absent() {
        let view = InvoiceView::from(&invoice(None));
        assert_eq!(view.amount_sats, None);
        assert_eq!(view.description, None);
        assert_eq!(view.payment_secret, None);
        assert_eq!(view.route_hints[0][0].htlc_maximum_sats, None);
    }

    #[test]
    fn test_view_hex_is_lowercase() {
        let view = InvoiceView::from(&invoice(None));
        assert_eq!(view.payment_hash, "ab".repeat(32));
        assert_eq!(view.features.as_deref(), Some("0242"));
    }

    #[test]
    fn test_expiry() {
        let invoice = invoice(None);
        assert_eq!(invoice.expires_at(), 1_700_003_600);
        assert!(!invoice.is_expired_at(1_700_003_599));
        assert!(invoice.is_expired_at(1_700_003_600));
    }
}
