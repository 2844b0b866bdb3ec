//! Application services (use cases).
//!
//! Everything hangs off one [`Node`]: lifecycle, chain sync, payments and
//! queries are `impl Node` blocks split by concern.

mod bridge;
mod chain;
mod channel;
mod input;
mod lifecycle;
mod node;
mod payment;
mod query;
mod state;
mod success;

pub use bridge::EventBridge;
pub use lifecycle::ChannelManagerParams;
pub use node::{Node, NodeSettings, DEFAULT_INVOICE_EXPIRY_SECS};
pub use payment::PaymentDispatched;
pub use query::VersionInfo;
pub use success::SuccessKind;
