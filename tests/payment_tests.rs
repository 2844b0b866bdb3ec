//! Invoice creation, decoding and payment dispatch.

use std::sync::Arc;

use lnbridge::domain::{ApiError, PayError, SendFailure};
use lnbridge::testkit::backend::MemoryBackend;
use lnbridge::testkit::fixtures;
use lnbridge::{Node, NodeSettings};

#[test]
fn round_trip_thousand_sats() {
    let (node, backend, _) = fixtures::ready_node();
    backend.add_channel(fixtures::usable_channel(fixtures::pubkey(2), 5_000_000));

    let request = node.create_payment_request(Some(1_000), "coffee").unwrap();
    assert!(request.to_str.starts_with("lnbcrt1"));
    assert_eq!(request.description.as_deref(), Some("coffee"));

    let decoded = node.decode(&request.to_str).unwrap();
    assert_eq!(decoded.amount_sats, Some(1_000));
    assert_eq!(decoded.expires_at, decoded.timestamp + decoded.expiry_time);

    let dispatched = node.pay(&request.to_str).unwrap();
    assert_eq!(dispatched.payment_hash, decoded.payment_hash);
}

#[test]
fn invoice_expiry_follows_settings() {
    let backend = Arc::new(MemoryBackend::new());
    let node = Node::with_settings(
        backend,
        NodeSettings {
            invoice_expiry_secs: 600,
            ..NodeSettings::default()
        },
    );
    fixtures::init_all(&node);

    let request = node.create_payment_request(None, "open amount").unwrap();
    assert_eq!(request.expiry_time, 600);
    assert_eq!(request.amount_sats, None);
}

#[test]
fn malformed_requests_fail_to_decode() {
    let (node, _, _) = fixtures::ready_node();
    for text in ["", "lnbc", "hello world", "lnbcrt1zzzz"] {
        assert_eq!(
            node.decode(text).unwrap_err().code(),
            "decode_invoice_fail",
            "{text:?}"
        );
    }
    assert_eq!(node.pay("lnbc").unwrap_err().code(), "decode_invoice_fail");
}

#[test]
fn published_request_decodes_without_subsystems() {
    let node = Node::new(Arc::new(MemoryBackend::new()));

    let decoded = node.decode(fixtures::BOLT11_DONATION).unwrap();

    assert_eq!(decoded.to_str, fixtures::BOLT11_DONATION);
    assert_eq!(decoded.amount_sats, None);
    assert_eq!(decoded.timestamp, 1_496_314_658);
    assert_eq!(decoded.expires_at, 1_496_314_658 + 3600);
    assert_eq!(
        decoded.payee_pub_key,
        "03e7156ae33b0a208d0744199163177e909e80176e55d97a2f221ede0f934dd9ad"
    );
    assert_eq!(decoded.payment_secret, Some("11".repeat(32)));
}

#[test]
fn amountless_published_request_is_not_payable() {
    let (node, _, _) = fixtures::ready_node();
    assert_eq!(
        node.pay(fixtures::BOLT11_DONATION).unwrap_err().code(),
        "invoice_payment_fail_invoice"
    );
}

#[test]
fn insufficient_capacity_is_routing_failure() {
    let (node, backend, _) = fixtures::ready_node();
    backend.add_channel(fixtures::usable_channel(fixtures::pubkey(2), 500_000));

    let request = node.create_payment_request(Some(1_000), "too big").unwrap();
    assert_eq!(
        node.pay(&request.to_str).unwrap_err().code(),
        "invoice_payment_fail_routing"
    );
}

#[test]
fn parameter_errors_carry_their_cause() {
    let (node, backend, _) = fixtures::ready_node();
    let request = node.create_payment_request(Some(1), "x").unwrap();

    let cases = [
        (
            ApiError::ApiMisuse("bad".into()),
            "invoice_payment_fail_parameter_error_api_misuse",
        ),
        (
            ApiError::FeeRateTooHigh {
                err: "cap".into(),
                feerate: 90_000,
            },
            "invoice_payment_fail_parameter_error_fee_rate_too_high",
        ),
        (
            ApiError::RouteError("loop".into()),
            "invoice_payment_fail_parameter_error_route_error",
        ),
        (
            ApiError::MonitorUpdateInProgress,
            "invoice_payment_fail_parameter_error_monitor_update_in_progress",
        ),
    ];

    for (api, code) in cases {
        backend.push_payment_result(Err(PayError::Sending(SendFailure::ParameterError(api))));
        assert_eq!(node.pay(&request.to_str).unwrap_err().code(), code);
    }
}

#[test]
fn partial_and_resend_safe_failures() {
    let (node, backend, _) = fixtures::ready_node();
    let request = node.create_payment_request(Some(1), "x").unwrap();

    backend.push_payment_result(Err(PayError::Sending(SendFailure::AllFailedResendSafe(
        vec![ApiError::ChannelUnavailable("offline".into())],
    ))));
    backend.push_payment_result(Err(PayError::Sending(SendFailure::PartialFailure {
        results: vec![Ok(()), Err(ApiError::MonitorUpdateInProgress)],
        payment_id: [9; 32],
    })));

    assert_eq!(
        node.pay(&request.to_str).unwrap_err().code(),
        "invoice_payment_fail_resend_safe"
    );
    assert_eq!(
        node.pay(&request.to_str).unwrap_err().code(),
        "invoice_payment_fail_partial"
    );
}

#[test]
fn invoice_creation_failure() {
    let (node, backend, _) = fixtures::ready_node();
    backend.fail_invoice_creation("signer unavailable");

    let err = node.create_payment_request(Some(1), "x").unwrap_err();
    assert_eq!(err.code(), "invoice_create_failed");
    assert!(err.to_string().contains("signer unavailable"));
}
