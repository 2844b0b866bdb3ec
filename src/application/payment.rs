//! Decoding, creating and paying payment requests.

use serde::Serialize;

use super::node::Node;
use super::success::SuccessKind;
use crate::domain::{sat_to_msat, Invoice, InvoiceView, PaymentFailure};
use crate::error::{Error, Result};
use crate::port::InvoiceRequest;

/// A payment handed to the dispatcher.
///
/// Whether it completes is reported later through `channel_manager_payment_*`
/// events carrying the same payment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDispatched {
    pub payment_id: String,
    pub payment_hash: String,
}

impl Node {
    fn parse_invoice(&self, text: &str) -> Result<Invoice> {
        self.backend
            .parse_invoice(text)
            .map_err(|e| Error::DecodeInvoice(e.to_string()))
    }

    /// Parse a payment request. Needs no subsystem.
    pub fn decode(&self, text: &str) -> Result<InvoiceView> {
        self.run(SuccessKind::InvoiceDecode, || {
            self.parse_invoice(text).map(|invoice| InvoiceView::from(&invoice))
        })
    }

    /// Decode and dispatch a payment for `text`.
    pub fn pay(&self, text: &str) -> Result<PaymentDispatched> {
        self.run(SuccessKind::InvoicePayment, || {
            let invoice_payer = self.snapshot().invoice_payer()?;
            let invoice = self.parse_invoice(text)?;

            let payment_id = invoice_payer
                .pay_invoice(&invoice)
                .map_err(PaymentFailure::from)?;
            Ok(PaymentDispatched {
                payment_id: hex::encode(payment_id),
                payment_hash: hex::encode(invoice.payment_hash),
            })
        })
    }

    /// Create a payment request to this node on the selected network.
    ///
    /// `amount_sats` of `None` leaves the amount to the payer.
    pub fn create_payment_request(
        &self,
        amount_sats: Option<u64>,
        description: &str,
    ) -> Result<InvoiceView> {
        self.run(SuccessKind::InvoiceCreate, || {
            let state = self.snapshot();
            let channel_manager = state.channel_manager()?;
            let keys_manager = state.keys_manager()?;
            let network = state.network()?;

            let amount_msat = amount_sats
                .map(|sats| {
                    sat_to_msat(sats).ok_or_else(|| {
                        Error::InvoiceCreate(format!("amount of {sats} sat overflows msat"))
                    })
                })
                .transpose()?;
            let request = InvoiceRequest {
                currency: network.currency(),
                amount_msat,
                description: description.to_owned(),
                expiry_secs: self.invoice_expiry_secs,
            };

            let invoice = self
                .backend
                .create_invoice(channel_manager.as_ref(), keys_manager.as_ref(), &request)
                .map_err(|e| Error::InvoiceCreate(e.to_string()))?;
            Ok(InvoiceView::from(&invoice))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::DEFAULT_INVOICE_EXPIRY_SECS;
    use crate::domain::{ApiError, Event, ManagerEvent, Network, PayError, SendFailure};
    use crate::testkit::backend::MemoryBackend;
    use crate::testkit::fixtures;

    #[test]
    fn test_created_request_decodes_back() {
        let (node, _, _) = fixtures::ready_node();
        let created = node.create_payment_request(Some(1_000), "coffee").unwrap();
        let decoded = node.decode(&created.to_str).unwrap();

        assert_eq!(decoded, created);
        assert_eq!(decoded.amount_sats, Some(1_000));
        assert_eq!(decoded.currency, Network::Regtest);
        assert_eq!(decoded.expiry_time, DEFAULT_INVOICE_EXPIRY_SECS);
        assert_eq!(decoded.payee_pub_key, node.node_id().unwrap());
    }

    #[test]
    fn test_decode_needs_no_subsystem() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        let err = node.decode("not an invoice").unwrap_err();
        assert_eq!(err.code(), "decode_invoice_fail");
    }

    #[test]
    fn test_create_requires_channel_manager() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        let err = node.create_payment_request(None, "tip").unwrap_err();
        assert_eq!(err.code(), "init_channel_manager");
    }

    #[test]
    fn test_create_overflowing_amount() {
        let (node, _, _) = fixtures::ready_node();
        let err = node.create_payment_request(Some(u64::MAX), "all").unwrap_err();
        assert_eq!(err.code(), "invoice_create_failed");
    }

    #[test]
    fn test_pay_checks_payer_before_decoding() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        let err = node.pay("garbage").unwrap_err();
        assert_eq!(err.code(), "init_invoice_payer");
    }

    #[test]
    fn test_pay_dispatches_over_usable_channel() {
        let (node, backend, recorder) = fixtures::ready_node();
        backend.add_channel(fixtures::usable_channel(fixtures::pubkey(5), 2_000_000));
        let request = node.create_payment_request(Some(1_000), "coffee").unwrap();

        let dispatched = node.pay(&request.to_str).unwrap();

        assert_eq!(dispatched.payment_hash, request.payment_hash);
        assert_eq!(dispatched.payment_id.len(), 64);
        assert!(recorder.events().iter().any(|event| matches!(
            event,
            Event::Manager(ManagerEvent::PaymentSent { payment_id: Some(id), .. })
                if hex::encode(id) == dispatched.payment_id
        )));
    }

    #[test]
    fn test_pay_without_route() {
        let (node, _, _) = fixtures::ready_node();
        let request = node.create_payment_request(Some(1_000), "coffee").unwrap();
        let err = node.pay(&request.to_str).unwrap_err();
        assert_eq!(err.code(), "invoice_payment_fail_routing");
    }

    #[test]
    fn test_pay_zero_amount_request() {
        let (node, backend, _) = fixtures::ready_node();
        backend.add_channel(fixtures::usable_channel(fixtures::pubkey(5), 2_000_000));
        let request = node.create_payment_request(None, "any").unwrap();
        let err = node.pay(&request.to_str).unwrap_err();
        assert_eq!(err.code(), "invoice_payment_fail_invoice");
    }

    #[test]
    fn test_pay_maps_send_failures() {
        let (node, backend, _) = fixtures::ready_node();
        let request = node.create_payment_request(Some(10), "x").unwrap();

        backend.push_payment_result(Err(PayError::Sending(SendFailure::ParameterError(
            ApiError::ChannelUnavailable("peer offline".into()),
        ))));
        backend.push_payment_result(Err(PayError::Sending(SendFailure::DuplicatePayment)));

        assert_eq!(
            node.pay(&request.to_str).unwrap_err().code(),
            "invoice_payment_fail_parameter_error_channel_unavailable"
        );
        assert_eq!(
            node.pay(&request.to_str).unwrap_err().code(),
            "invoice_payment_fail_duplicate"
        );
    }
}
