//! Feed behaviour against a local stub of the quote service

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use liquidity::{LiquidityConfig, PriceFeed, ProfileService, Tier};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use types::ids::Symbol;
use types::numeric::Price;

/// Serve canned quote/profile payloads; counts quote hits so tests can
/// observe caching.
async fn spawn_stub(quote_hits: Arc<AtomicUsize>) -> String {
    let quote = {
        let hits = quote_hits.clone();
        get(move |Query(params): Query<HashMap<String, String>>| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let body = match params.get("symbol").map(String::as_str) {
                    Some("FLAT") => json!({"c": 0.0, "pc": 0.0}),
                    Some("DRIFT") => json!({"c": 149.985, "pc": 148.0}),
                    _ => json!({"c": 150.0, "h": 151.0, "l": 149.0, "o": 149.5, "pc": 148.5}),
                };
                Json(body)
            }
        })
    };

    let profile = get(|Query(params): Query<HashMap<String, String>>| async move {
        let body: Value = match params.get("symbol").map(String::as_str) {
            Some("AAPL") => json!({"name": "Apple Inc", "marketCapitalization": 3_400_000.0}),
            Some("SNAP") => json!({"name": "Snap Inc", "marketCapitalization": 18_000.0}),
            _ => json!({}),
        };
        Json(body)
    });

    let app = Router::new()
        .route("/quote", quote)
        .route("/stock/profile2", profile);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn stub_config(base_url: String, ttl_secs: u64) -> LiquidityConfig {
    LiquidityConfig {
        api_key: Some("test-token".into()),
        feed_base_url: base_url,
        price_cache_ttl_secs: ttl_secs,
        ..LiquidityConfig::default()
    }
}

#[tokio::test]
async fn fetches_and_caches_within_ttl() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits.clone()).await;
    let feed = PriceFeed::new(&stub_config(base_url, 30));
    let symbol = Symbol::new("AAPL");

    let first = feed.get(&symbol).await;
    assert_eq!(first, Some(Price::parse("150.00").unwrap()));

    let second = feed.get(&symbol).await;
    assert_eq!(second, first);

    // Second call was served from cache
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(feed.cached(&symbol), first);
}

#[tokio::test]
async fn zero_ttl_expires_immediately() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits.clone()).await;
    let feed = PriceFeed::new(&stub_config(base_url, 0));
    let symbol = Symbol::new("AAPL");

    feed.get(&symbol).await.unwrap();
    feed.get(&symbol).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(feed.cached(&symbol), None);
}

#[tokio::test]
async fn non_positive_price_is_not_stored() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits.clone()).await;
    let feed = PriceFeed::new(&stub_config(base_url, 30));
    let symbol = Symbol::new("FLAT");

    assert_eq!(feed.get(&symbol).await, None);
    assert_eq!(feed.cached(&symbol), None);

    // The failed result was not cached, so the next get fetches again
    assert_eq!(feed.get(&symbol).await, None);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn refresh_evicts_before_fetching() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits.clone()).await;
    let feed = PriceFeed::new(&stub_config(base_url, 3600));
    let symbol = Symbol::new("AAPL");

    feed.get(&symbol).await.unwrap();
    let refreshed = feed.refresh(&symbol).await;

    assert_eq!(refreshed, Some(Price::parse("150.00").unwrap()));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetched_price_rounds_half_up_to_cents() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits).await;
    let feed = PriceFeed::new(&stub_config(base_url, 30));

    let price = feed.get(&Symbol::new("DRIFT")).await.unwrap();
    assert_eq!(price, Price::parse("149.99").unwrap());
}

#[tokio::test]
async fn profile_tiers_from_market_cap() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(hits).await;
    let service = ProfileService::new(&stub_config(base_url, 30));

    let mega = service.get(&Symbol::new("AAPL")).await;
    assert_eq!(mega.tier, Tier::MegaCap);
    assert_eq!(mega.base_spread_bps, 1);
    assert_eq!(mega.base_quantity, 1000);

    let mid = service.get(&Symbol::new("SNAP")).await;
    assert_eq!(mid.tier, Tier::MidCap);

    // Empty payload (unknown symbol) degrades to the unknown tier
    let unknown = service.get(&Symbol::new("NOPE")).await;
    assert_eq!(unknown.tier, Tier::Unknown);
}
