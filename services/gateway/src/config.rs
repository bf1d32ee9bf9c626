//! Gateway configuration
//!
//! Defaults first, environment overrides second. Every liquidity option
//! maps to one env var so a deployment can run with nothing but a shell
//! environment.

use liquidity::LiquidityConfig;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use types::numeric::Price;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub liquidity: LiquidityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            liquidity: LiquidityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Build from the process environment
    ///
    /// Recognised vars: `LISTEN_ADDR`, `LIQUIDITY_ENABLED`,
    /// `FALLBACK_PRICE`, `REFRESH_INTERVAL_MS`, `PRICE_CACHE_TTL_SECONDS`,
    /// `FINNHUB_API_KEY`, `FEED_BASE_URL`. Unset vars keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = env_parse::<SocketAddr>("LISTEN_ADDR")? {
            config.listen_addr = addr;
        }
        if let Some(enabled) = env_parse::<bool>("LIQUIDITY_ENABLED")? {
            config.liquidity.enabled = enabled;
        }
        if let Some(raw) = env_raw("FALLBACK_PRICE") {
            config.liquidity.fallback_price =
                Price::parse(&raw).map_err(|_| ConfigError::Invalid {
                    key: "FALLBACK_PRICE",
                    value: raw,
                })?;
        }
        if let Some(interval) = env_parse::<u64>("REFRESH_INTERVAL_MS")? {
            config.liquidity.refresh_interval_ms = interval;
        }
        if let Some(ttl) = env_parse::<u64>("PRICE_CACHE_TTL_SECONDS")? {
            config.liquidity.price_cache_ttl_secs = ttl;
        }
        if let Some(key) = env_raw("FINNHUB_API_KEY") {
            config.liquidity.api_key = Some(key);
        }
        if let Some(url) = env_raw("FEED_BASE_URL") {
            config.liquidity.feed_base_url = url;
        }

        Ok(config)
    }
}

fn env_raw(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env_raw(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
