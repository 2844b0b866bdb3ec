//! Architecture contract tests.

mod support;

use support::architecture::{find_code_lines_containing, find_non_export_lines_in_mod_files};

#[test]
fn domain_has_no_outer_layer_imports() {
    let hits = find_code_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::application",
            "crate::infrastructure",
            "crate::port",
            "tokio::",
            "tracing::",
        ],
    );

    assert!(hits.is_empty(), "found forbidden imports in domain layer: {hits:#?}");
}

#[test]
fn ports_do_not_depend_on_implementations() {
    let hits = find_code_lines_containing(
        "src/port",
        &["crate::adapter", "crate::application", "crate::infrastructure"],
    );

    assert!(hits.is_empty(), "ports should only name domain types: {hits:#?}");
}

#[test]
fn callback_adapters_only_talk_to_the_bridge() {
    let hits = find_code_lines_containing(
        "src/adapter/callback",
        &["crate::infrastructure", "application::Node", "application::node"],
    );

    assert!(
        hits.is_empty(),
        "callback adapters should reach the host through the event bridge only: {hits:#?}"
    );
}

#[test]
fn library_code_does_not_print() {
    let hits = find_code_lines_containing("src", &["println!", "eprintln!", "dbg!"]);
    assert!(hits.is_empty(), "use tracing instead of printing: {hits:#?}");
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn ldk_stays_behind_the_backend_adapter() {
    for layer in ["src/domain", "src/port", "src/application", "src/infrastructure"] {
        let hits = find_code_lines_containing(
            layer,
            &[
                "use lightning::",
                "use lightning_invoice",
                "use lightning_types",
                "lightning_net_tokio::",
            ],
        );
        assert!(
            hits.is_empty(),
            "only adapters may name the Lightning library: {hits:#?}"
        );
    }
}

#[test]
fn bolt11_codec_is_shared_by_every_backend() {
    let hits = find_code_lines_containing("src/testkit", &["use lightning_invoice"]);
    assert!(
        hits.is_empty(),
        "the test backend should go through adapter::bolt11: {hits:#?}"
    );
}
