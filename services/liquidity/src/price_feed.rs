//! Reference-price cache
//!
//! Symbol → last fetched price, valid while younger than the TTL. A miss
//! blocks on a remote quote fetch; a failed fetch stores nothing so the
//! next call retries.

use crate::config::{LiquidityConfig, FETCH_TIMEOUT_SECS};
use crate::error::FeedError;
use dashmap::DashMap;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use types::ids::Symbol;
use types::numeric::Price;

struct CachedPrice {
    price: Price,
    fetched_at: Instant,
}

impl CachedPrice {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

/// TTL-bounded reference-price cache with fill-on-miss
pub struct PriceFeed {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    ttl: Duration,
    cache: DashMap<Symbol, CachedPrice>,
}

impl PriceFeed {
    pub fn new(config: &LiquidityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("http client");

        Self {
            client,
            base_url: config.feed_base_url.clone(),
            api_key: config.credential().map(str::to_string),
            ttl: Duration::from_secs(config.price_cache_ttl_secs),
            cache: DashMap::new(),
        }
    }

    /// Get a price for a symbol, fetching on a cache miss
    ///
    /// Blocks on the remote quote service when the cached entry is missing
    /// or expired. Returns `None` on any fetch failure; nothing is stored
    /// in that case.
    pub async fn get(&self, symbol: &Symbol) -> Option<Price> {
        if let Some(cached) = self.cache.get(symbol) {
            if !cached.is_expired(self.ttl) {
                debug!(%symbol, price = %cached.price, "price cache hit");
                return Some(cached.price);
            }
        }

        match self.fetch(symbol).await {
            Ok(price) => {
                self.cache.insert(
                    symbol.clone(),
                    CachedPrice {
                        price,
                        fetched_at: Instant::now(),
                    },
                );
                info!(%symbol, %price, "fetched reference price");
                Some(price)
            }
            Err(FeedError::NoApiKey) => {
                debug!(%symbol, "no API key configured, cannot fetch price");
                None
            }
            Err(err) => {
                warn!(%symbol, %err, "reference price fetch failed");
                None
            }
        }
    }

    /// Cached price without fetching; `None` if absent or expired
    pub fn cached(&self, symbol: &Symbol) -> Option<Price> {
        self.cache
            .get(symbol)
            .filter(|cached| !cached.is_expired(self.ttl))
            .map(|cached| cached.price)
    }

    /// Evict the entry, then fetch fresh
    pub async fn refresh(&self, symbol: &Symbol) -> Option<Price> {
        self.cache.remove(symbol);
        self.get(symbol).await
    }

    /// All non-expired cached prices, for monitoring
    pub fn all_cached(&self) -> Vec<(Symbol, Price)> {
        self.cache
            .iter()
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| (entry.key().clone(), entry.price))
            .collect()
    }

    pub fn clear(&self) {
        self.cache.clear();
        info!("price cache cleared");
    }

    async fn fetch(&self, symbol: &Symbol) -> Result<Price, FeedError> {
        let key = self.api_key.as_deref().ok_or(FeedError::NoApiKey)?;
        let url = format!("{}/quote?symbol={}&token={}", self.base_url, symbol, key);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            reqwest::StatusCode::OK => Self::parse_quote(response.json::<Value>().await?),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(FeedError::RateLimited),
            status => Err(FeedError::Status(status)),
        }
    }

    /// Quote payload: `{"c":150.0,"h":151.0,"l":149.0,"o":149.5,"pc":148.5}`
    /// where `c` is the current price.
    fn parse_quote(body: Value) -> Result<Price, FeedError> {
        if let Some(error) = body.get("error") {
            return Err(FeedError::Malformed(error.to_string()));
        }

        let current = body
            .get("c")
            .and_then(Value::as_f64)
            .ok_or_else(|| FeedError::Malformed("missing current price".into()))?;
        if current <= 0.0 {
            return Err(FeedError::NoPrice);
        }

        let decimal = Decimal::from_f64(current)
            .ok_or_else(|| FeedError::Malformed("unrepresentable price".into()))?;
        Ok(Price::new(decimal).round_half_up_2dp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quote_rounds_half_up() {
        let price = PriceFeed::parse_quote(json!({"c": 150.005, "pc": 149.0})).unwrap();
        assert_eq!(price, Price::parse("150.01").unwrap());
    }

    #[test]
    fn test_parse_quote_rejects_non_positive() {
        assert!(matches!(
            PriceFeed::parse_quote(json!({"c": 0.0})),
            Err(FeedError::NoPrice)
        ));
        assert!(matches!(
            PriceFeed::parse_quote(json!({"c": -3.5})),
            Err(FeedError::NoPrice)
        ));
    }

    #[test]
    fn test_parse_quote_rejects_missing_field() {
        assert!(matches!(
            PriceFeed::parse_quote(json!({"pc": 12.0})),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_quote_surfaces_service_error() {
        assert!(matches!(
            PriceFeed::parse_quote(json!({"error": "unknown symbol"})),
            Err(FeedError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_get_without_key_returns_none() {
        let feed = PriceFeed::new(&LiquidityConfig::default());
        assert_eq!(feed.get(&Symbol::new("AAPL")).await, None);
        assert_eq!(feed.cached(&Symbol::new("AAPL")), None);
    }
}
