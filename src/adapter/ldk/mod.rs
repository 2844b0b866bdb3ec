//! Production backend on the Lightning Development Kit.

mod backend;
mod callback;
mod convert;
mod event;
mod subsystem;
mod types;

pub use backend::{LdkBackend, LDK_VERSION};
