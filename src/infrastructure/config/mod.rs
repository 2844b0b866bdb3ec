//! Node configuration loading and validation.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [log_relay]
//! gossip = false
//!
//! [fees]
//! high = 5000
//! normal = 2000
//! low = 1000
//!
//! [channel]
//! accept_inbound = true
//! announced = false
//! min_handshake_depth = 3
//!
//! [invoice]
//! expiry_secs = 3600
//! ```
//!
//! Every section and field is optional.

mod channel;
mod fees;
mod invoice;
mod logging;
mod relay;
mod settings;

pub use channel::ChannelConfig;
pub use fees::FeesConfig;
pub use invoice::InvoiceConfig;
pub use logging::LoggingConfig;
pub use relay::LogRelayConfig;
pub use settings::Config;
