//! Operation outcomes wrapped in the JSON reply envelope.

use std::sync::Arc;

use serde_json::Value;

use lnbridge::adapter::Reply;
use lnbridge::application::SuccessKind;
use lnbridge::testkit::backend::MemoryBackend;
use lnbridge::testkit::fixtures;
use lnbridge::Node;

fn parse(reply: &Reply) -> Value {
    serde_json::from_str(&reply.to_json()).unwrap()
}

#[test]
fn success_reply_carries_kind_and_payload() {
    let (node, _, _) = fixtures::ready_node();
    let reply = Reply::from_result(
        SuccessKind::InvoiceCreate,
        node.create_payment_request(Some(1_000), "coffee"),
    );

    let json = parse(&reply);
    assert_eq!(json["ok"], true);
    assert_eq!(json["kind"], "invoice_create_success");
    assert_eq!(json["payload"]["amount_sats"], 1_000);
    assert_eq!(json["payload"]["currency"], "regtest");
}

#[test]
fn failure_reply_carries_code() {
    let node = Node::new(Arc::new(MemoryBackend::new()));
    let reply = Reply::from_result(SuccessKind::ListChannels, node.list_channels());

    let json = parse(&reply);
    assert!(!reply.is_ok());
    assert_eq!(json["ok"], false);
    assert_eq!(json["code"], "init_channel_manager");
    assert!(json["message"].as_str().unwrap().contains("channel_manager"));
}

#[test]
fn unit_results_have_null_payload() {
    let (node, _, _) = fixtures::ready_node();
    let reply = Reply::from_result(SuccessKind::FeesUpdated, node.update_fees(3, 2, 1));
    assert_eq!(parse(&reply)["payload"], Value::Null);
}

#[test]
fn version_reply() {
    let node = Node::new(Arc::new(MemoryBackend::new()));
    let json = parse(&Reply::from_result(SuccessKind::Version, node.version()));
    assert_eq!(json["payload"]["library_version"], "memory-0.1");
}
