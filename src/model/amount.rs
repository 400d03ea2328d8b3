//! Amount type for handling euro values.
//!
//! This module provides the `Amount` type which wraps `Decimal` and always displays with a
//! trailing euro sign.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

const EURO: char = '€';

/// Represents a euro amount.
///
/// Amounts are always displayed with a trailing euro sign and without insignificant trailing
/// zeros, which is how the payment sheet writes its prices.
///
/// # Examples
///
/// ```
/// # use family_dues::model::Amount;
/// # use rust_decimal::Decimal;
/// let amount = Amount::euros(13);
/// assert_eq!(amount.to_string(), "13€");
///
/// let amount = Amount::new(Decimal::new(1350, 2));
/// assert_eq!(amount.to_string(), "13.5€");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates a new Amount from a whole number of euros.
    pub fn euros(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Error returned when parsing an [`Amount`] from a string fails.
#[derive(Debug)]
pub struct AmountError(rust_decimal::Error);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_suffix(EURO)
            .or_else(|| trimmed.strip_prefix(EURO))
            .unwrap_or(trimmed)
            .trim();
        let value = Decimal::from_str(number).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{EURO}", self.0.normalize())
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display() {
        assert_eq!(Amount::euros(26).to_string(), "26€");
        assert_eq!(Amount::ZERO.to_string(), "0€");
        let amount = Amount::new(Decimal::from_str("10.00").unwrap());
        assert_eq!(amount.to_string(), "10€");
    }

    #[test]
    fn test_sum() {
        let total: Amount = vec![Amount::euros(10), Amount::euros(13), Amount::euros(13)]
            .into_iter()
            .sum();
        assert_eq!(total, Amount::euros(36));
        let empty: Amount = Vec::<Amount>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Amount::euros(43)).unwrap();
        assert_eq!(json, "\"43€\"");
        let json = serde_json::to_string(&Amount::new(Decimal::new(1350, 2))).unwrap();
        assert_eq!(json, "\"13.5€\"");
    }
}
