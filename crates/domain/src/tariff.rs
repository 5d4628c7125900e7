//! Tariff: flat price per kWh used to cost the energy report.

use serde::{Deserialize, Serialize};

use crate::error::{HomeError, ValidationError};

/// Default price per kWh.
pub const DEFAULT_RATE_PER_KWH: f64 = 0.009;

/// Default currency label for costs.
pub const DEFAULT_CURRENCY: &str = "Fils";

/// Flat energy price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub rate_per_kwh: f64,
    pub currency: String,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            rate_per_kwh: DEFAULT_RATE_PER_KWH,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Tariff {
    /// Build a tariff, rejecting negative or non-finite rates.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] when the rate is negative or not finite.
    pub fn new(rate_per_kwh: f64, currency: impl Into<String>) -> Result<Self, HomeError> {
        if !rate_per_kwh.is_finite() || rate_per_kwh < 0.0 {
            return Err(ValidationError::NegativeRate(rate_per_kwh).into());
        }
        Ok(Self {
            rate_per_kwh,
            currency: currency.into(),
        })
    }

    /// Price of `energy_kwh`.
    #[must_use]
    pub fn cost(&self, energy_kwh: f64) -> f64 {
        energy_kwh * self.rate_per_kwh
    }
}
