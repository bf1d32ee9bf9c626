//! Identifier types for exchange entities
//!
//! Exchange order ids and execution ids are drawn from two monotonic
//! counters and rendered in the venue's wire format (`ORD7`, `EXEC42`).
//! Client order ids stay plain strings: they are opaque tokens owned by
//! the submitting session.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Exchange-assigned order identifier
///
/// Monotonically increasing across the process lifetime; two orders never
/// share one. Displayed and serialized as `ORD{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD{}", self.0)
    }
}

impl Serialize for OrderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_tagged(&s, "ORD")
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom("expected ORD{n}"))
    }
}

/// Exchange-assigned execution identifier
///
/// Independent counter from [`OrderId`]. Displayed and serialized as `EXEC{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecId(u64);

impl ExecId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXEC{}", self.0)
    }
}

impl Serialize for ExecId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExecId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_tagged(&s, "EXEC")
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom("expected EXEC{n}"))
    }
}

fn parse_tagged(s: &str, prefix: &str) -> Option<u64> {
    s.strip_prefix(prefix)?.parse().ok()
}

/// Ticker symbol
///
/// Uppercased on construction so that `aapl` and `AAPL` address the same
/// order book regardless of which boundary the string entered through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_display() {
        assert_eq!(OrderId::new(7).to_string(), "ORD7");
        assert_eq!(ExecId::new(42).to_string(), "EXEC42");
    }

    #[test]
    fn test_order_id_serde_round_trip() {
        let id = OrderId::new(15);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ORD15\"");

        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_exec_id_rejects_wrong_prefix() {
        let result: Result<ExecId, _> = serde_json::from_str("\"ORD3\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_symbol_uppercases() {
        assert_eq!(Symbol::new("aapl").as_str(), "AAPL");
        assert_eq!(Symbol::new("MSFT"), Symbol::new("msft"));
    }

    #[test]
    fn test_symbol_serde_transparent() {
        let symbol = Symbol::new("TSLA");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"TSLA\"");
    }
}
