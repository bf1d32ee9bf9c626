use liquidity::{LiquidityConfig, LiquidityProvider, PriceFeed, ProfileService};
use matching_engine::MatchingEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
///
/// The engine is the unit of serialization: every mutating call takes the
/// one lock. The caches and the provider are lock-free reads, so the
/// inspection endpoints never queue behind matching.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<MatchingEngine>>,
    pub liquidity: Arc<LiquidityProvider>,
    pub price_feed: Arc<PriceFeed>,
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    pub fn new(config: &LiquidityConfig) -> Self {
        let price_feed = Arc::new(PriceFeed::new(config));
        let profiles = Arc::new(ProfileService::new(config));
        let liquidity = Arc::new(LiquidityProvider::new(
            config,
            price_feed.clone(),
            profiles.clone(),
        ));
        let engine = Arc::new(Mutex::new(MatchingEngine::new(liquidity.clone())));

        Self {
            engine,
            liquidity,
            price_feed,
            profiles,
        }
    }
}
