//! Error taxonomy shared by every caller-facing operation.
//!
//! Each [`Error`] variant maps to a stable code string via [`Error::code`].
//! The code is the contract with the host; the `Display` text keeps the
//! original cause for diagnostics.

use thiserror::Error;

use crate::domain::{PaymentFailure, Subsystem};
use crate::port::BackendError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    /// The host already installed a global tracing subscriber.
    #[error("failed to install log subscriber: {0}")]
    Logging(#[source] tracing_subscriber::util::TryInitError),
}

#[derive(Error, Debug)]
pub enum Error {
    /// A subsystem handle was already set; handles are never replaced.
    #[error("{0} is already initialized")]
    AlreadyInitialized(Subsystem),

    /// A required subsystem handle is absent.
    #[error("{0} is not initialized")]
    NotInitialized(Subsystem),

    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("failed to decode invoice: {0}")]
    DecodeInvoice(String),

    #[error("invoice payment failed: {0}")]
    Payment(#[from] PaymentFailure),

    #[error("failed to create invoice: {0}")]
    InvoiceCreate(String),

    #[error("failed to add peer: {0}")]
    AddPeer(String),

    #[error("failed to close channel: {0}")]
    CloseChannel(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unclassified failure raised by the Lightning library.
    #[error("lightning library error: {0}")]
    Library(String),
}

impl Error {
    /// Stable, caller-facing error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::AlreadyInitialized(_) => "already_init",
            Error::NotInitialized(subsystem) => subsystem.init_code(),
            Error::InvalidSeed(_) => "invalid_seed_hex",
            Error::InvalidNetwork(_) => "invalid_network",
            Error::InvalidInput { .. } => "invalid_input",
            Error::DecodeInvoice(_) => "decode_invoice_fail",
            Error::Payment(failure) => failure.code(),
            Error::InvoiceCreate(_) => "invoice_create_failed",
            Error::AddPeer(_) => "add_peer_fail",
            Error::CloseChannel(_) => "close_channel_fail",
            Error::Config(_) => "invalid_config",
            Error::Library(_) => "unknown_error",
        }
    }

    pub(crate) fn invalid_input(field: &'static str, reason: impl ToString) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.to_string(),
        }
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Error::Library(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
