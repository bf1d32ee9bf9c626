//! Fixed-point decimal price type
//!
//! Uses rust_decimal for exact arithmetic; prices are never compared or
//! stored through binary floating point. Serialized as strings to prevent
//! JSON number precision loss.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Decimal price with exact comparisons
///
/// Zero is a valid value: executions that are not fills carry a zero price,
/// and market orders are modelled with a zero limit price. Negative prices
/// are not representable through the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Create a new Price from a Decimal
    ///
    /// # Panics
    /// Panics if the value is negative
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Price must not be negative");
        Self(value)
    }

    /// Try to create a Price, returning None on a negative value
    pub fn try_new(value: Decimal) -> Option<Self> {
        (value >= Decimal::ZERO).then_some(Self(value))
    }

    /// Create from integer (for testing/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn parse(s: &str) -> Result<Self, rust_decimal::Error> {
        let decimal = Decimal::from_str(s)?;
        Self::try_new(decimal)
            .ok_or_else(|| rust_decimal::Error::ErrorString("price must not be negative".into()))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round to two decimal places toward zero (posted bid quotes)
    pub fn round_down_2dp(&self) -> Self {
        Self(self.0.round_dp_with_strategy(2, RoundingStrategy::ToZero))
    }

    /// Round to two decimal places away from zero (posted ask quotes)
    pub fn round_up_2dp(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::AwayFromZero),
        )
    }

    /// Round to two decimal places, midpoint away from zero (fetched prices)
    pub fn round_half_up_2dp(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must not be negative"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_creation() {
        let price = Price::from_u64(150);
        assert_eq!(price.as_decimal(), Decimal::from(150));
        assert!(price.is_positive());
        assert!(!Price::ZERO.is_positive());
    }

    #[test]
    #[should_panic(expected = "Price must not be negative")]
    fn test_price_negative_panics() {
        Price::new(dec!(-1));
    }

    #[test]
    fn test_price_ordering_is_exact() {
        let a = Price::parse("10.00").unwrap();
        let b = Price::parse("10.0").unwrap();
        let c = Price::parse("10.01").unwrap();
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn test_directed_rounding() {
        let p = Price::new(dec!(149.985));
        assert_eq!(p.round_down_2dp(), Price::new(dec!(149.98)));

        let p = Price::new(dec!(150.015));
        assert_eq!(p.round_up_2dp(), Price::new(dec!(150.02)));

        // Exact 2dp values survive both directions unchanged
        let p = Price::new(dec!(149.97));
        assert_eq!(p.round_down_2dp(), p);
        assert_eq!(p.round_up_2dp(), p);
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(
            Price::new(dec!(123.455)).round_half_up_2dp(),
            Price::new(dec!(123.46))
        );
        assert_eq!(
            Price::new(dec!(123.454)).round_half_up_2dp(),
            Price::new(dec!(123.45))
        );
    }

    #[test]
    fn test_price_serialization() {
        let price = Price::parse("150.25").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"150.25\"");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_price_deserialize_rejects_negative() {
        let result: Result<Price, _> = serde_json::from_str("\"-5.00\"");
        assert!(result.is_err());
    }
}
