//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! `lightning` is the wrapped library, `callback` what that library calls
//! back into, and `subscriber` the host that receives events.

pub mod callback;
pub mod lightning;
pub mod subscriber;
