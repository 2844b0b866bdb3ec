//! BOLT 11 payment requests.
//!
//! Both backends decode and sign through here, so a request created by one
//! node decodes the same way on any other.

use std::str::FromStr;
use std::time::Duration;

use bitcoin::hashes::{sha256, Hash};
use bitcoin::secp256k1::{Secp256k1, SecretKey};
use lightning_invoice::{
    Bolt11Invoice, Bolt11InvoiceDescription, Currency as Bolt11Currency, InvoiceBuilder,
};
use lightning_types::payment::PaymentSecret;
use lightning_types::routing::{RouteHint, RouteHintHop as Bolt11Hop, RoutingFees};

use crate::domain::{Currency, Invoice, RouteHintHop};
use crate::port::{BackendError, InvoiceRequest};

/// Final hop CLTV delta written into created requests.
pub const MIN_FINAL_CLTV_EXPIRY_DELTA: u16 = 144;

/// Payment hash and secret the payee registered for a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundPayment {
    pub payment_hash: [u8; 32],
    pub payment_secret: [u8; 32],
}

/// Parse an encoded payment request.
pub fn decode(text: &str) -> Result<Invoice, BackendError> {
    let invoice =
        Bolt11Invoice::from_str(text.trim()).map_err(|e| BackendError::new(e.to_string()))?;
    project(&invoice)
}

/// Build and sign a payment request with `node_secret`.
///
/// `now` becomes the request timestamp. Each inner vector of `route_hints`
/// is one private route to this node.
pub fn sign(
    request: &InvoiceRequest,
    inbound: InboundPayment,
    route_hints: &[Vec<RouteHintHop>],
    node_secret: &SecretKey,
    now: Duration,
) -> Result<Invoice, BackendError> {
    let mut builder = InvoiceBuilder::new(bolt11_currency(request.currency))
        .description(request.description.clone())
        .payment_hash(sha256::Hash::from_byte_array(inbound.payment_hash))
        .payment_secret(PaymentSecret(inbound.payment_secret))
        .duration_since_epoch(now)
        .min_final_cltv_expiry_delta(u64::from(MIN_FINAL_CLTV_EXPIRY_DELTA))
        .expiry_time(Duration::from_secs(request.expiry_secs));
    if let Some(amount_msat) = request.amount_msat {
        builder = builder.amount_milli_satoshis(amount_msat);
    }
    for hint in route_hints {
        builder = builder.private_route(RouteHint(hint.iter().map(bolt11_hop).collect()));
    }

    let secp = Secp256k1::signing_only();
    let invoice = builder
        .build_signed(|message| secp.sign_ecdsa_recoverable(message, node_secret))
        .map_err(|e| BackendError::new(e.to_string()))?;
    project(&invoice)
}

fn bolt11_currency(currency: Currency) -> Bolt11Currency {
    match currency {
        Currency::Bitcoin => Bolt11Currency::Bitcoin,
        Currency::BitcoinTestnet => Bolt11Currency::BitcoinTestnet,
        Currency::Regtest => Bolt11Currency::Regtest,
    }
}

fn bolt11_hop(hop: &RouteHintHop) -> Bolt11Hop {
    Bolt11Hop {
        src_node_id: hop.src_node_id,
        short_channel_id: hop.short_channel_id,
        fees: RoutingFees {
            base_msat: hop.fee_base_msat,
            proportional_millionths: hop.fee_proportional_millionths,
        },
        cltv_expiry_delta: hop.cltv_expiry_delta,
        htlc_minimum_msat: hop.htlc_minimum_msat,
        htlc_maximum_msat: hop.htlc_maximum_msat,
    }
}

fn project(invoice: &Bolt11Invoice) -> Result<Invoice, BackendError> {
    let currency = match invoice.currency() {
        Bolt11Currency::Bitcoin => Currency::Bitcoin,
        Bolt11Currency::BitcoinTestnet => Currency::BitcoinTestnet,
        Bolt11Currency::Regtest => Currency::Regtest,
        other => {
            return Err(BackendError::new(format!("unsupported currency {other:?}")));
        }
    };

    Ok(Invoice {
        text: invoice.to_string(),
        network: currency.network(),
        amount_msat: invoice.amount_milli_satoshis(),
        description: match invoice.description() {
            Bolt11InvoiceDescription::Direct(description) => Some(description.to_string()),
            Bolt11InvoiceDescription::Hash(_) => None,
        },
        timestamp: invoice.duration_since_epoch().as_secs(),
        expiry_secs: invoice.expiry_time().as_secs(),
        min_final_cltv_expiry_delta: invoice.min_final_cltv_expiry_delta(),
        route_hints: invoice
            .route_hints()
            .iter()
            .map(|hint| {
                hint.0
                    .iter()
                    .map(|hop| RouteHintHop {
                        src_node_id: hop.src_node_id,
                        short_channel_id: hop.short_channel_id,
                        fee_base_msat: hop.fees.base_msat,
                        fee_proportional_millionths: hop.fees.proportional_millionths,
                        cltv_expiry_delta: hop.cltv_expiry_delta,
                        htlc_minimum_msat: hop.htlc_minimum_msat,
                        htlc_maximum_msat: hop.htlc_maximum_msat,
                    })
                    .collect()
            })
            .collect(),
        payee_pubkey: invoice.recover_payee_pub_key(),
        payment_hash: invoice.payment_hash().to_byte_array(),
        payment_secret: Some(invoice.payment_secret().0),
        features: invoice.features().map(|features| features.le_flags().to_vec()),
    })
}
