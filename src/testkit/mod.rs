//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`backend`] - `MemoryBackend`, a scriptable in-memory Lightning library.
//! - [`recording`] - Subscribers that record, fail or panic.
//! - [`fixtures`] - Canonical seeds, keys, headers, transactions and a ready node.

pub mod backend;
pub mod fixtures;
pub mod recording;
