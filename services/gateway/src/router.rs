use crate::handlers::{book, liquidity_api, orders};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/orders", post(orders::submit))
        .route("/orders/cancel", post(orders::cancel))
        .route("/orders/amend", post(orders::amend))
        .route("/exchange/orderbook/:symbol", get(book::snapshot))
        .route("/exchange/symbols", get(book::symbols))
        .route("/liquidity/status", get(liquidity_api::status))
        .route("/liquidity/profile/:symbol", get(liquidity_api::profile))
        .route("/liquidity/prices", get(liquidity_api::prices))
        .route("/liquidity/setup/:symbol", post(liquidity_api::setup))
        .route(
            "/liquidity/price/refresh/:symbol",
            post(liquidity_api::refresh_price),
        )
        .route("/liquidity/cache/clear", post(liquidity_api::clear_caches));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
