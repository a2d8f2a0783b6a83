//! Weight-banded delivery tariff.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::traits::Tariff;

/// Flat rate up to a weight threshold, plus a surcharge for every started
/// block of weight above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTariff {
    /// Cost per distance unit while carrying at most `threshold`.
    pub base_rate: f64,
    /// Heaviest load still billed at `base_rate` (inclusive).
    pub threshold: f64,
    /// Size of each surcharge block above the threshold.
    pub block_size: f64,
    /// Added to the rate for each started block.
    pub surcharge: f64,
    /// Bill legs driven with nothing on board at the base rate. Off by
    /// default, so only loaded legs cost anything, including legs that only
    /// carry a zero-weight pickup.
    pub charge_empty_legs: bool,
}

impl Default for BlockTariff {
    fn default() -> Self {
        Self {
            base_rate: 10.0,
            threshold: 5.0,
            block_size: 5.0,
            surcharge: 8.0,
            charge_empty_legs: false,
        }
    }
}

impl BlockTariff {
    pub fn new(base_rate: f64, threshold: f64, block_size: f64, surcharge: f64) -> Self {
        Self {
            base_rate,
            threshold,
            block_size,
            surcharge,
            charge_empty_legs: false,
        }
    }

    pub fn charging_empty_legs(mut self) -> Self {
        self.charge_empty_legs = true;
        self
    }

    /// Reject parameters that would make `rate` negative, infinite or NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("base_rate", self.base_rate),
            ("threshold", self.threshold),
            ("surcharge", self.surcharge),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("tariff {name} is {value}")));
            }
        }
        if !self.block_size.is_finite() || self.block_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tariff block_size must be positive, got {}",
                self.block_size
            )));
        }
        Ok(())
    }

    /// Number of surcharge blocks billed for `weight`; partial blocks count
    /// as whole ones.
    pub fn blocks(&self, weight: f64) -> f64 {
        if weight <= self.threshold {
            return 0.0;
        }
        ((weight - self.threshold) / self.block_size).ceil()
    }
}

impl Tariff for BlockTariff {
    fn rate(&self, weight: f64) -> f64 {
        self.base_rate + self.surcharge * self.blocks(weight)
    }

    fn leg_rate(&self, carried: f64) -> f64 {
        if carried > 0.0 || self.charge_empty_legs {
            self.rate(carried)
        } else {
            0.0
        }
    }
}
