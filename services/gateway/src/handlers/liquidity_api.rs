//! Liquidity provider monitoring and control

use crate::error::ApiError;
use crate::models::{PriceResponse, SetupResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use liquidity::provider::ProviderStatus;
use liquidity::LiquidityProfile;
use serde_json::{json, Value};
use std::collections::HashMap;
use types::ids::Symbol;

pub async fn status(State(state): State<AppState>) -> Json<ProviderStatus> {
    Json(state.liquidity.status())
}

/// Profile for one symbol, fetching and classifying on first request
pub async fn profile(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<LiquidityProfile> {
    let symbol = Symbol::new(symbol);
    Json(state.profiles.get(&symbol).await)
}

/// All currently cached reference prices
pub async fn prices(State(state): State<AppState>) -> Json<HashMap<String, types::numeric::Price>> {
    let prices = state
        .price_feed
        .all_cached()
        .into_iter()
        .map(|(symbol, price)| (symbol.to_string(), price))
        .collect();
    Json(prices)
}

/// Manually seed liquidity for a symbol
pub async fn setup(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SetupResponse>, ApiError> {
    if !state.liquidity.is_enabled() {
        return Err(ApiError::BadRequest(
            "liquidity provider is disabled".to_string(),
        ));
    }

    let symbol = Symbol::new(symbol);
    let seeded = state.engine.lock().await.setup_liquidity(&symbol).await;

    Ok(Json(SetupResponse {
        has_liquidity: state.liquidity.is_active(&symbol),
        symbol,
        seeded,
    }))
}

/// Evict and re-fetch the reference price for a symbol
pub async fn refresh_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let symbol = Symbol::new(symbol);

    match state.price_feed.refresh(&symbol).await {
        Some(price) => Ok(Json(PriceResponse { symbol, price })),
        None => Err(ApiError::NotFound(format!(
            "unable to fetch price for {symbol}"
        ))),
    }
}

/// Drop both caches; the next touch re-fetches everything
pub async fn clear_caches(State(state): State<AppState>) -> Json<Value> {
    state.price_feed.clear();
    state.profiles.clear();
    Json(json!({"status": "price and profile caches cleared"}))
}
