//! Two-decimal money values for display and export.
//!
//! Bill amounts are stored as `f64` so the data file layout stays fixed.
//! Anything shown to a user or written to a report goes through [`Money`]
//! so it always carries exactly two decimal places.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// A currency amount rounded to 2 decimal places.
///
/// # Examples
///
/// ```
/// use electricity_billing::Money;
///
/// assert_eq!(Money::from_f64(944.0).to_string(), "944.00");
/// assert_eq!(Money::from_f64(1.23456).to_string(), "1.23");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a `Money` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Money(rounded)
    }

    /// Converts a stored floating point amount.
    ///
    /// NaN and infinities have no decimal representation and become zero.
    pub fn from_f64(value: f64) -> Self {
        match Decimal::from_f64(value) {
            Some(d) => Money::new(d),
            None => Money::ZERO,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_pads_to_two_places() {
        assert_eq!(Money::from_f64(944.0).to_string(), "944.00");
        assert_eq!(Money::from_f64(59.0).to_string(), "59.00");
        assert_eq!(Money::from_f64(0.5).to_string(), "0.50");
    }

    #[test]
    fn test_float_noise_is_rounded_away() {
        // (150 * 5 + 50) * 1.18 is not exactly 944 in binary
        let amount = (150.0 * 5.0 + 50.0) * 1.18;
        assert_eq!(Money::from_f64(amount).to_string(), "944.00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(Money::from_f64(-7.129).to_string(), "-7.13");
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(Money::from_f64(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_f64(f64::INFINITY), Money::ZERO);
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }
}
