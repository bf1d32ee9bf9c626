//! Read-only order-book inspection

use crate::models::{BookOrder, BookSnapshot};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use types::ids::Symbol;
use types::order::Side;

fn default_depth() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct DepthQuery {
    #[serde(default = "default_depth")]
    pub depth: usize,
}

/// Book snapshot for one symbol; an untouched symbol yields empty sides
pub async fn snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<DepthQuery>,
) -> Json<BookSnapshot> {
    let symbol = Symbol::new(symbol);
    let engine = state.engine.lock().await;

    let snapshot = match engine.book(&symbol) {
        Some(book) => BookSnapshot {
            symbol,
            bids: book
                .orders_at(Side::Buy, query.depth)
                .into_iter()
                .map(BookOrder::from)
                .collect(),
            asks: book
                .orders_at(Side::Sell, query.depth)
                .into_iter()
                .map(BookOrder::from)
                .collect(),
            best_bid: book.best_bid_price(),
            best_ask: book.best_ask_price(),
        },
        None => BookSnapshot {
            symbol,
            bids: Vec::new(),
            asks: Vec::new(),
            best_bid: None,
            best_ask: None,
        },
    };

    Json(snapshot)
}

/// Every symbol with a book
pub async fn symbols(State(state): State<AppState>) -> Json<Vec<Symbol>> {
    let mut symbols = state.engine.lock().await.symbols();
    symbols.sort();
    Json(symbols)
}
