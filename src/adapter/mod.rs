//! Implementations of ports (hexagonal adapters).

pub mod bolt11;
pub mod callback;
#[cfg(feature = "ldk")]
pub mod ldk;
pub mod reply;
pub mod subscriber;

pub use reply::Reply;
