use serde::Deserialize;

use crate::adapter::callback::FeeRates;

/// Initial fee rates, sat per 1000 weight. Hosts update them at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeesConfig {
    pub high: u32,
    pub normal: u32,
    pub low: u32,
}

impl Default for FeesConfig {
    fn default() -> Self {
        let rates = FeeRates::default();
        Self {
            high: rates.high,
            normal: rates.normal,
            low: rates.low,
        }
    }
}

impl From<FeesConfig> for FeeRates {
    fn from(config: FeesConfig) -> Self {
        Self {
            high: config.high,
            normal: config.normal,
            low: config.low,
        }
    }
}
