//! Top-level node configuration.

use std::path::Path;

use serde::Deserialize;

use super::{ChannelConfig, FeesConfig, InvoiceConfig, LogRelayConfig, LoggingConfig};
use crate::application::NodeSettings;
use crate::domain::UserConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub log_relay: LogRelayConfig,
    pub fees: FeesConfig,
    pub channel: ChannelConfig,
    pub invoice: InvoiceConfig,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        let fees = &self.fees;
        if fees.high == 0 || fees.normal == 0 || fees.low == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "rates must be greater than 0".to_string(),
            }
            .into());
        }
        if fees.high < fees.normal || fees.normal < fees.low {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "rates must be ordered high >= normal >= low".to_string(),
            }
            .into());
        }
        if self.invoice.expiry_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "expiry_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) -> Result<()> {
        Ok(self.logging.init()?)
    }

    /// Channel policy for [`Node::init_config`](crate::application::Node::init_config).
    #[must_use]
    pub fn user_config(&self) -> UserConfig {
        self.channel.into()
    }

    #[must_use]
    pub fn node_settings(&self) -> NodeSettings {
        NodeSettings {
            fee_rates: self.fees.into(),
            relayed_log_levels: self.log_relay.active_levels(),
            invoice_expiry_secs: self.invoice.expiry_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.user_config(), UserConfig::default());
        assert!(!config.log_relay.is_active(LogLevel::Gossip));
    }

    #[test]
    fn test_sections_are_applied() {
        let config = Config::parse_toml(
            r#"
            [log_relay]
            debug = false

            [fees]
            high = 8000
            normal = 4000
            low = 500

            [channel]
            announced = true
            min_handshake_depth = 6

            [invoice]
            expiry_secs = 900
            "#,
        )
        .unwrap();

        let settings = config.node_settings();
        assert_eq!(settings.fee_rates.normal, 4000);
        assert_eq!(settings.invoice_expiry_secs, 900);
        assert!(!settings.relayed_log_levels.contains(&LogLevel::Debug));
        assert!(settings.relayed_log_levels.contains(&LogLevel::Info));

        let user = config.user_config();
        assert!(user.announced_channels);
        assert_eq!(user.min_handshake_depth, 6);
    }

    #[test]
    fn test_rejects_zero_fee() {
        let err = Config::parse_toml("[fees]\nlow = 0").unwrap_err();
        assert_eq!(err.code(), "invalid_config");
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_rejects_unordered_fees() {
        let err = Config::parse_toml("[fees]\nhigh = 1000\nnormal = 2000\nlow = 500").unwrap_err();
        assert!(err.to_string().contains("high >= normal >= low"));
    }

    #[test]
    fn test_rejects_zero_expiry() {
        assert!(Config::parse_toml("[invoice]\nexpiry_secs = 0").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::parse_toml("[fees\nhigh = ").unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(ConfigError::Parse(_))));
    }
}
