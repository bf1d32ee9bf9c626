//! Market-cap tier classification
//!
//! Each symbol is classified once per session into a tier that fixes its
//! quoting parameters: tighter spreads and more size for the mega caps,
//! wider and thinner for everything else. Fundamentals are assumed stable
//! for a trading session, so profiles cache indefinitely.

use crate::config::{LiquidityConfig, FETCH_TIMEOUT_SECS};
use crate::error::FeedError;
use dashmap::DashMap;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use types::ids::Symbol;

const MEGA_CAP_FLOOR: Decimal = dec!(500_000_000_000);
const LARGE_CAP_FLOOR: Decimal = dec!(50_000_000_000);
const MID_CAP_FLOOR: Decimal = dec!(10_000_000_000);

/// Market-capitalisation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    MegaCap,
    LargeCap,
    MidCap,
    SmallCap,
    /// Classification failed (no credential, fetch error, unknown symbol)
    Unknown,
}

impl Tier {
    pub fn classify(market_cap: Decimal) -> Self {
        if market_cap >= MEGA_CAP_FLOOR {
            Tier::MegaCap
        } else if market_cap >= LARGE_CAP_FLOOR {
            Tier::LargeCap
        } else if market_cap >= MID_CAP_FLOOR {
            Tier::MidCap
        } else {
            Tier::SmallCap
        }
    }
}

/// Quoting parameters for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityProfile {
    pub symbol: Symbol,
    pub tier: Tier,
    pub market_cap: Option<Decimal>,
    pub base_spread_bps: u32,
    pub level_increment_bps: u32,
    pub base_quantity: u64,
    pub quantity_multiplier: u64,
    pub levels: u32,
}

impl LiquidityProfile {
    /// Profile for a tier with that tier's standard parameters
    pub fn for_tier(symbol: Symbol, tier: Tier, market_cap: Option<Decimal>) -> Self {
        let (base_spread_bps, level_increment_bps, base_quantity) = match tier {
            Tier::MegaCap => (1, 1, 1000),
            Tier::LargeCap => (2, 2, 500),
            Tier::MidCap => (5, 3, 200),
            Tier::SmallCap | Tier::Unknown => (10, 5, 100),
        };

        Self {
            symbol,
            tier,
            market_cap,
            base_spread_bps,
            level_increment_bps,
            base_quantity,
            quantity_multiplier: 2,
            levels: 5,
        }
    }

    /// Human-readable market cap (`$3.4T`, `$150.0B`, `$5.2M`)
    pub fn market_cap_display(&self) -> String {
        let Some(cap) = self.market_cap else {
            return "Unknown".to_string();
        };

        let trillion = dec!(1_000_000_000_000);
        let billion = dec!(1_000_000_000);
        let million = dec!(1_000_000);

        if cap >= trillion {
            format!("${:.1}T", cap / trillion)
        } else if cap >= billion {
            format!("${:.1}B", cap / billion)
        } else if cap >= million {
            format!("${:.1}M", cap / million)
        } else {
            format!("${:.0}", cap)
        }
    }
}

/// Per-symbol profile cache, filled by blocking remote fetches
pub struct ProfileService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: DashMap<Symbol, LiquidityProfile>,
}

impl ProfileService {
    pub fn new(config: &LiquidityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("http client");

        Self {
            client,
            base_url: config.feed_base_url.clone(),
            api_key: config.credential().map(str::to_string),
            cache: DashMap::new(),
        }
    }

    /// Get or create the profile for a symbol
    ///
    /// Fetches company metadata on the first request; every failure mode
    /// degrades to the `Unknown` tier. The result is cached for the life
    /// of the process either way.
    pub async fn get(&self, symbol: &Symbol) -> LiquidityProfile {
        if let Some(cached) = self.cache.get(symbol) {
            debug!(%symbol, tier = ?cached.tier, "profile cache hit");
            return cached.clone();
        }

        let profile = self.fetch_and_classify(symbol).await;
        info!(
            %symbol,
            tier = ?profile.tier,
            market_cap = %profile.market_cap_display(),
            spread_bps = profile.base_spread_bps,
            base_qty = profile.base_quantity,
            "classified symbol"
        );
        self.cache.insert(symbol.clone(), profile.clone());
        profile
    }

    /// Cache-only lookup, no fetch
    pub fn cached(&self, symbol: &Symbol) -> Option<LiquidityProfile> {
        self.cache.get(symbol).map(|entry| entry.value().clone())
    }

    /// All cached profiles, for monitoring
    pub fn all(&self) -> Vec<LiquidityProfile> {
        self.cache.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn clear(&self) {
        self.cache.clear();
        info!("profile cache cleared");
    }

    async fn fetch_and_classify(&self, symbol: &Symbol) -> LiquidityProfile {
        let Some(key) = self.api_key.as_deref() else {
            warn!(%symbol, "no API key, classifying as unknown tier");
            return LiquidityProfile::for_tier(symbol.clone(), Tier::Unknown, None);
        };

        match self.fetch(symbol, key).await {
            Ok(body) => Self::classify_response(symbol, body),
            Err(err) => {
                warn!(%symbol, %err, "profile fetch failed, using unknown tier");
                LiquidityProfile::for_tier(symbol.clone(), Tier::Unknown, None)
            }
        }
    }

    async fn fetch(&self, symbol: &Symbol, key: &str) -> Result<Value, FeedError> {
        let url = format!(
            "{}/stock/profile2?symbol={}&token={}",
            self.base_url, symbol, key
        );

        let response = self.client.get(&url).send().await?;
        match response.status() {
            reqwest::StatusCode::OK => Ok(response.json::<Value>().await?),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(FeedError::RateLimited),
            status => Err(FeedError::Status(status)),
        }
    }

    /// The profile payload reports `marketCapitalization` in millions of
    /// dollars; scale up before classifying.
    fn classify_response(symbol: &Symbol, body: Value) -> LiquidityProfile {
        let Some(cap_millions) = body.get("marketCapitalization").and_then(Value::as_f64) else {
            warn!(%symbol, "no market cap in profile response, using unknown tier");
            return LiquidityProfile::for_tier(symbol.clone(), Tier::Unknown, None);
        };

        match Decimal::from_f64(cap_millions) {
            Some(millions) => {
                let market_cap = millions * dec!(1_000_000);
                let tier = Tier::classify(market_cap);
                LiquidityProfile::for_tier(symbol.clone(), tier, Some(market_cap))
            }
            None => LiquidityProfile::for_tier(symbol.clone(), Tier::Unknown, None),
        }
    }
}
