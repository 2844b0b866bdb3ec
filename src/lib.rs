//! lnbridge - Lifecycle orchestrator and event bridge for an embedded Lightning node.
//!
//! A host application (mobile app, desktop shell, service) drives a Lightning
//! node through plain calls with hex and string inputs, and receives
//! everything the node wants from it (broadcasts, persistence, chain watch
//! requests, logs, payment events) as one stream of named events.
//!
//! # Architecture
//!
//! - **`domain`** - Plain data: subsystems, networks, events, channel, graph
//!   and invoice projections, payment failures.
//! - **`port`** - Traits the node is written against: the Lightning library
//!   ([`port::LightningBackend`]), the library's callbacks and the event
//!   [`port::Subscriber`].
//! - **`adapter`** - Callback implementations that turn library requests into
//!   events, the BOLT 11 codec, the LDK backend (feature `ldk`, on by
//!   default), ready-made subscribers and the JSON [`adapter::Reply`] envelope.
//! - **`application`** - The [`Node`]: ordered init, chain sync, payments,
//!   peers, persistence and queries, plus the [`application::EventBridge`].
//! - **`infrastructure`** - TOML configuration and tracing setup.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "ldk")]
//! # fn main() {
//! use std::sync::Arc;
//!
//! use lnbridge::adapter::ldk::LdkBackend;
//! use lnbridge::adapter::subscriber::LogSubscriber;
//! use lnbridge::domain::UserConfig;
//! use lnbridge::Node;
//!
//! fn start(seed_hex: &str) -> lnbridge::Result<Node> {
//!     let node = Node::new(Arc::new(LdkBackend::new()?));
//!     node.set_subscriber(Arc::new(LogSubscriber));
//!     node.init_chain_monitor()?;
//!     node.init_keys_manager(seed_hex)?;
//!     node.init_config(UserConfig::default())?;
//!     Ok(node)
//! }
//! # }
//! # #[cfg(not(feature = "ldk"))]
//! # fn main() {}
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use application::{ChannelManagerParams, Node, NodeSettings};
pub use error::{Error, Result};
