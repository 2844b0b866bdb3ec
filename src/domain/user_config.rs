//! Channel policy handed to the channel manager.

use serde::{Deserialize, Serialize};

/// Channel handshake and acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Accept inbound channel open requests at all.
    pub accept_inbound: bool,
    /// Hold inbound requests until the host accepts them explicitly.
    pub manually_accept_inbound: bool,
    /// Announce channels to the public network.
    pub announced_channels: bool,
    /// Confirmations required before a channel is considered open.
    pub min_handshake_depth: u32,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            accept_inbound: true,
            manually_accept_inbound: false,
            announced_channels: false,
            min_handshake_depth: 1,
        }
    }
}
