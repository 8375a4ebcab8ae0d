//! Type-safe price representation using decimal arithmetic.
//!
//! The bookstore lists every price in Indian rupees, so there is no
//! currency field: a `Price` is just a non-negative decimal amount.

use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol used when displaying prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A price in rupees.
///
/// Deserializes from either a JSON number or a numeric string, since the
/// API is not consistent about which one it sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Format for display, e.g. `₹499` or `₹12.50`.
    ///
    /// Whole amounts are printed without decimals, fractional ones with two.
    #[must_use]
    pub fn display(&self) -> String {
        if self.0.fract().is_zero() {
            format!("{CURRENCY_SYMBOL}{}", self.0.trunc())
        } else {
            format!("{CURRENCY_SYMBOL}{:.2}", self.0)
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_and_fractional() {
        assert_eq!(Price::from_rupees(499).display(), "₹499");
        assert_eq!("12.5".parse::<Price>().unwrap().display(), "₹12.50");
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Price = serde_json::from_str("350").unwrap();
        let from_string: Price = serde_json::from_str("\"350\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_rupees(350));
    }

    #[test]
    fn test_multiply_and_sum() {
        let total: Price = [Price::from_rupees(100) * 2, Price::from_rupees(50) * 1]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_rupees(250));
    }

    #[test]
    fn test_negative_detection() {
        assert!("-1".parse::<Price>().unwrap().is_negative());
        assert!(!Price::ZERO.is_negative());
    }
}
