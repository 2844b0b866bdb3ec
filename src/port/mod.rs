//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!              host calls                       events
//!   Host ────────────────▶ Node ──▶ EventBridge ──────▶ Subscriber
//!                           │            ▲
//!                 build / forward        │ callbacks
//!                           ▼            │
//!                    LightningBackend ───┘
//! ```
//!
//! # Available Ports
//!
//! - [`LightningBackend`] and the subsystem traits it builds
//! - [`FeeEstimator`], [`Logger`], [`Broadcaster`], [`Filter`], [`Persister`],
//!   [`EventHandler`] - callbacks from the library
//! - [`Subscriber`] - event consumer

pub mod outbound;

pub use outbound::callback::{
    Broadcaster, ConfirmationTarget, EventHandler, FeeEstimator, Filter, Logger, Persister,
    WatchedOutput,
};
pub use outbound::lightning::{
    BackendError, ChainMonitor, ChainMonitorDeps, ChannelManager, ChannelManagerDeps,
    ChannelManagerParts, ChannelManagerSource, Confirm, InvoicePayer, InvoiceRequest, KeysManager,
    LightningBackend, NetworkGraph, PeerHandler, Scorer,
};
pub use outbound::subscriber::Subscriber;
