//! Liquidity provider configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::numeric::Price;

/// Remote fetch timeout, shared by the quote and profile endpoints
pub const FETCH_TIMEOUT_SECS: u64 = 5;

/// All liquidity-provider settings in one place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityConfig {
    /// Master switch; when off, no quotes are ever planned
    pub enabled: bool,
    /// Reference price of last resort for symbols nothing else can price
    pub fallback_price: Price,
    /// Cadence of the periodic quote refresh
    pub refresh_interval_ms: u64,
    /// How long a fetched reference price stays valid
    pub price_cache_ttl_secs: u64,
    /// Quote-service credential; empty or unset disables external fetches
    pub api_key: Option<String>,
    /// Quote-service base URL (overridable for tests)
    pub feed_base_url: String,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_price: Price::parse("100.00").expect("literal price"),
            refresh_interval_ms: 5_000,
            price_cache_ttl_secs: 30,
            api_key: None,
            feed_base_url: "https://finnhub.io/api/v1".to_string(),
        }
    }
}

impl LiquidityConfig {
    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fallback_price.is_positive() {
            return Err(ConfigError::InvalidFallbackPrice);
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        if self.feed_base_url.is_empty() {
            return Err(ConfigError::MissingFeedUrl);
        }
        Ok(())
    }

    /// The effective credential, treating an empty string as unset
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fallback price must be positive")]
    InvalidFallbackPrice,

    #[error("refresh interval must be positive")]
    InvalidRefreshInterval,

    #[error("feed base URL must not be empty")]
    MissingFeedUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = LiquidityConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enabled);
        assert_eq!(config.refresh_interval_ms, 5_000);
        assert_eq!(config.price_cache_ttl_secs, 30);
    }

    #[test]
    fn test_invalid_refresh_interval() {
        let config = LiquidityConfig {
            refresh_interval_ms: 0,
            ..LiquidityConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRefreshInterval));
    }

    #[test]
    fn test_empty_api_key_is_no_credential() {
        let mut config = LiquidityConfig::default();
        assert_eq!(config.credential(), None);

        config.api_key = Some(String::new());
        assert_eq!(config.credential(), None);

        config.api_key = Some("token".into());
        assert_eq!(config.credential(), Some("token"));
    }
}
