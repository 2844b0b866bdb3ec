//! Host-updatable fee estimator.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::port::{ConfirmationTarget, FeeEstimator};

/// Lowest rate the library accepts, in satoshis per 1000 weight units.
#[cfg(feature = "ldk")]
pub const MIN_FEE_RATE: u32 = lightning::chain::chaininterface::FEERATE_FLOOR_SATS_PER_KW;
/// Lowest rate the library accepts, in satoshis per 1000 weight units.
#[cfg(not(feature = "ldk"))]
pub const MIN_FEE_RATE: u32 = 253;

/// Fee rates in satoshis per 1000 weight units, per confirmation urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRates {
    pub high: u32,
    pub normal: u32,
    pub low: u32,
}

impl Default for FeeRates {
    fn default() -> Self {
        Self {
            high: 5_000,
            normal: 2_000,
            low: 1_000,
        }
    }
}

/// Serves the last rates set by the host.
///
/// Rates are read from library threads while the host updates them, so each
/// one is an independent atomic. Reads are floored at [`MIN_FEE_RATE`].
pub struct FeeEstimatorAdapter {
    high: AtomicU32,
    normal: AtomicU32,
    low: AtomicU32,
}

impl FeeEstimatorAdapter {
    #[must_use]
    pub fn new(rates: FeeRates) -> Self {
        Self {
            high: AtomicU32::new(rates.high),
            normal: AtomicU32::new(rates.normal),
            low: AtomicU32::new(rates.low),
        }
    }

    pub fn update(&self, rates: FeeRates) {
        self.high.store(rates.high, Ordering::Relaxed);
        self.normal.store(rates.normal, Ordering::Relaxed);
        self.low.store(rates.low, Ordering::Relaxed);
    }

    /// Rates as last set, before flooring.
    #[must_use]
    pub fn rates(&self) -> FeeRates {
        FeeRates {
            high: self.high.load(Ordering::Relaxed),
            normal: self.normal.load(Ordering::Relaxed),
            low: self.low.load(Ordering::Relaxed),
        }
    }
}

impl Default for FeeEstimatorAdapter {
    fn default() -> Self {
        Self::new(FeeRates::default())
    }
}

impl FeeEstimator for FeeEstimatorAdapter {
    fn sat_per_1000_weight(&self, target: ConfirmationTarget) -> u32 {
        let rate = match target {
            ConfirmationTarget::HighPriority => &self.high,
            ConfirmationTarget::Normal => &self.normal,
            ConfirmationTarget::Background => &self.low,
        };
        rate.load(Ordering::Relaxed).max(MIN_FEE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_map_to_rates() {
        let fees = FeeEstimatorAdapter::new(FeeRates {
            high: 9_000,
            normal: 4_000,
            low: 1_500,
        });
        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::HighPriority), 9_000);
        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::Normal), 4_000);
        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::Background), 1_500);
    }

    #[test]
    fn test_update_and_floor() {
        let fees = FeeEstimatorAdapter::default();
        fees.update(FeeRates {
            high: 300,
            normal: 100,
            low: 0,
        });

        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::HighPriority), 300);
        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::Normal), MIN_FEE_RATE);
        assert_eq!(fees.sat_per_1000_weight(ConfirmationTarget::Background), MIN_FEE_RATE);
        assert_eq!(fees.rates().low, 0);
    }
}
