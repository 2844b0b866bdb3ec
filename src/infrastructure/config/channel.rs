use serde::Deserialize;

use crate::domain::UserConfig;

/// Channel acceptance and announcement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub accept_inbound: bool,
    pub manually_accept_inbound: bool,
    pub announced: bool,
    pub min_handshake_depth: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        let user = UserConfig::default();
        Self {
            accept_inbound: user.accept_inbound,
            manually_accept_inbound: user.manually_accept_inbound,
            announced: user.announced_channels,
            min_handshake_depth: user.min_handshake_depth,
        }
    }
}

impl From<ChannelConfig> for UserConfig {
    fn from(config: ChannelConfig) -> Self {
        Self {
            accept_inbound: config.accept_inbound,
            manually_accept_inbound: config.manually_accept_inbound,
            announced_channels: config.announced,
            min_handshake_depth: config.min_handshake_depth,
        }
    }
}
