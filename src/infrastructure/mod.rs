//! Infrastructure: configuration and process-level setup.

pub mod config;
