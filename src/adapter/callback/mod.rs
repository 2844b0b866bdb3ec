//! Adapters for the callbacks the Lightning library invokes.
//!
//! Everything except the fee estimator forwards into the event bridge.
//! With the `ldk` feature the same adapters serve LDK's callback traits.

mod broadcaster;
mod event_handler;
mod fee;
mod filter;
mod logger;
mod persister;

pub use broadcaster::BroadcasterAdapter;
pub use event_handler::LibraryEventHandler;
pub use fee::{FeeEstimatorAdapter, FeeRates, MIN_FEE_RATE};
pub use filter::FilterAdapter;
pub use logger::LogRelay;
pub use persister::PersisterAdapter;
