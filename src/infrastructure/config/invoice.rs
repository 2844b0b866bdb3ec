use serde::Deserialize;

use crate::application::DEFAULT_INVOICE_EXPIRY_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Expiry of created payment requests, in seconds.
    pub expiry_secs: u64,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            expiry_secs: DEFAULT_INVOICE_EXPIRY_SECS,
        }
    }
}
