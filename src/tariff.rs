//! Per-unit tariff rates.

use std::fmt;

/// The three flat per-unit prices.
///
/// Only `domestic_rate` takes part in bill computation. The commercial and
/// industrial rates are kept, edited and persisted but no customer is ever
/// billed at them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    /// Price per unit for domestic customers.
    pub domestic_rate: f64,

    /// Price per unit for commercial customers.
    pub commercial_rate: f64,

    /// Price per unit for industrial customers.
    pub industrial_rate: f64,
}

impl Tariff {
    pub const DEFAULT_DOMESTIC_RATE: f64 = 5.0;
    pub const DEFAULT_COMMERCIAL_RATE: f64 = 7.5;
    pub const DEFAULT_INDUSTRIAL_RATE: f64 = 10.0;

    /// Returns the rate for the given class.
    pub fn rate(&self, class: RateClass) -> f64 {
        match class {
            RateClass::Domestic => self.domestic_rate,
            RateClass::Commercial => self.commercial_rate,
            RateClass::Industrial => self.industrial_rate,
        }
    }

    /// Replaces one rate. The caller guarantees `rate` is non-negative.
    pub fn set_rate(&mut self, class: RateClass, rate: f64) {
        match class {
            RateClass::Domestic => self.domestic_rate = rate,
            RateClass::Commercial => self.commercial_rate = rate,
            RateClass::Industrial => self.industrial_rate = rate,
        }
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Tariff {
            domestic_rate: Self::DEFAULT_DOMESTIC_RATE,
            commercial_rate: Self::DEFAULT_COMMERCIAL_RATE,
            industrial_rate: Self::DEFAULT_INDUSTRIAL_RATE,
        }
    }
}

/// Selects one of the tariff's rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateClass {
    Domestic,
    Commercial,
    Industrial,
}

impl RateClass {
    /// All classes in menu order.
    pub const ALL: [RateClass; 3] = [
        RateClass::Domestic,
        RateClass::Commercial,
        RateClass::Industrial,
    ];
}

impl fmt::Display for RateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RateClass::Domestic => "Domestic",
            RateClass::Commercial => "Commercial",
            RateClass::Industrial => "Industrial",
        };
        f.write_str(label)
    }
}
