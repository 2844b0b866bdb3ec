//! The node driven by the real LDK backend.

#![cfg(feature = "ldk")]

use std::sync::Arc;

use lnbridge::adapter::ldk::{LdkBackend, LDK_VERSION};
use lnbridge::domain::Event;
use lnbridge::testkit::fixtures::{self, SEED_HEX};
use lnbridge::testkit::recording::RecordingSubscriber;
use lnbridge::{ChannelManagerParams, Node};

fn ldk_node() -> (Node, Arc<RecordingSubscriber>) {
    let node = Node::new(Arc::new(LdkBackend::new().unwrap()));
    let recorder = Arc::new(RecordingSubscriber::new());
    node.set_subscriber(recorder.clone());
    (node, recorder)
}

#[test]
fn ldk_node_reports_library_version() {
    let (node, _) = ldk_node();
    assert_eq!(node.version().unwrap().library_version, LDK_VERSION);
}

#[test]
fn ldk_node_issues_requests_it_can_decode() {
    let (node, _) = ldk_node();
    fixtures::init_all(&node);

    let request = node.create_payment_request(Some(2_000), "ldk coffee").unwrap();
    assert!(request.to_str.starts_with("lnbcrt20u1"));

    let decoded = node.decode(&request.to_str).unwrap();
    assert_eq!(decoded.payee_pub_key, node.node_id().unwrap());
    assert_eq!(decoded.amount_sats, Some(2_000));
    assert_eq!(decoded.description.as_deref(), Some("ldk coffee"));
    assert!(decoded.route_hints.is_empty());
}

#[test]
fn ldk_node_starts_with_empty_state() {
    let (node, _) = ldk_node();
    fixtures::init_all(&node);

    assert!(node.list_channels().unwrap().is_empty());
    assert!(node.list_peers().unwrap().is_empty());
    assert!(node.list_monitors().unwrap().is_empty());
    assert!(node.graph_nodes().unwrap().is_empty());
}

#[test]
fn ldk_node_restores_its_own_manager() {
    let (first, recorder) = ldk_node();
    fixtures::init_all(&first);
    recorder.clear();
    first.persist_manager().unwrap();
    let serialized = recorder
        .non_log_events()
        .into_iter()
        .find_map(|event| match event {
            Event::PersistManager(blob) => Some(hex::encode(blob)),
            _ => None,
        })
        .expect("persist_manager event");

    let (second, _) = ldk_node();
    second.init_chain_monitor().unwrap();
    second.init_keys_manager(SEED_HEX).unwrap();
    second.init_config(Default::default()).unwrap();
    second
        .init_network_graph(&fixtures::regtest_genesis_hex())
        .unwrap();
    second
        .init_channel_manager(&ChannelManagerParams {
            serialized_manager: Some(serialized),
            channel_monitors: Some(vec![]),
            ..fixtures::fresh_params()
        })
        .unwrap();

    assert_eq!(second.node_id().unwrap(), first.node_id().unwrap());
}

#[test]
fn ldk_node_rejects_foreign_manager_bytes() {
    let (node, _) = ldk_node();
    node.init_chain_monitor().unwrap();
    node.init_keys_manager(SEED_HEX).unwrap();
    node.init_config(Default::default()).unwrap();
    node.init_network_graph(&fixtures::regtest_genesis_hex())
        .unwrap();

    let err = node
        .init_channel_manager(&ChannelManagerParams {
            serialized_manager: Some("00ff".into()),
            channel_monitors: Some(vec![]),
            ..fixtures::fresh_params()
        })
        .unwrap_err();
    assert_eq!(err.code(), "unknown_error");
}

#[test]
fn unreachable_peer_is_add_peer_fail() {
    let (node, _) = ldk_node();
    fixtures::init_all(&node);
    let peer = fixtures::pubkey(9).to_string();

    let err = node.add_peer("127.0.0.1", 1, &peer, 2_000).unwrap_err();
    assert_eq!(err.code(), "add_peer_fail");
}

#[test]
fn closing_unknown_channel_fails() {
    let (node, _) = ldk_node();
    fixtures::init_all(&node);
    let counterparty = fixtures::pubkey(3).to_string();

    let err = node
        .close_channel(&"11".repeat(32), &counterparty, false)
        .unwrap_err();
    assert_eq!(err.code(), "close_channel_fail");
}
