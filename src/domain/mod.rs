//! Library-agnostic value types: what flows through the node, not how.

pub mod amount;
mod channel;
mod event;
mod graph;
mod invoice;
mod log;
mod network;
mod payment;
mod peer;
mod subsystem;
mod user_config;

pub use amount::{msat_to_sat, sat_to_msat, MSAT_PER_SAT};
pub use channel::{ChannelDetails, ChannelView, RouteHop, RouteHopView};
pub use event::{Event, ManagerEvent};
pub use graph::{ChannelInfo, ChannelInfoView, DirectionalInfo, DirectionalView, NodeInfo, NodeView};
pub use invoice::{Invoice, InvoiceView, RouteHintHop, RouteHintHopView};
pub use log::{LogEvent, LogLevel, LogOrigin, LogRecord};
pub use network::{Currency, Network};
pub use payment::{ApiError, ParameterCause, PayError, PaymentFailure, SendFailure};
pub use peer::PeerView;
pub use subsystem::Subsystem;
pub use user_config::UserConfig;
