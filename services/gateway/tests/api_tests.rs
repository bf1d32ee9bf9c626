//! HTTP round trips against a locally spawned gateway
//!
//! Liquidity is disabled so the books contain exactly what the tests put
//! in them.

use gateway::models::{BookSnapshot, ExecutionReport};
use gateway::router::create_router;
use gateway::state::AppState;
use liquidity::LiquidityConfig;
use serde_json::json;
use types::execution::ExecType;
use types::numeric::Price;
use types::order::OrderStatus;

async fn spawn_app() -> String {
    let config = LiquidityConfig {
        enabled: false,
        ..LiquidityConfig::default()
    };
    let state = AppState::new(&config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

#[tokio::test]
async fn submit_rests_and_shows_in_snapshot() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let reports: Vec<ExecutionReport> = client
        .post(format!("{base}/orders"))
        .json(&json!({
            "cl_ord_id": "s1",
            "symbol": "aapl",
            "side": "SELL",
            "order_type": "LIMIT",
            "price": "10.00",
            "quantity": 100
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].exec_type, ExecType::New);
    assert_eq!(reports[0].leaves_qty, 100);
    assert!(reports[0].order_id.is_some());

    // Symbol was uppercased at the boundary
    let snapshot: BookSnapshot = client
        .get(format!("{base}/exchange/orderbook/AAPL"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(snapshot.asks.len(), 1);
    assert_eq!(snapshot.asks[0].quantity, 100);
    assert_eq!(snapshot.best_ask, Some(Price::parse("10.00").unwrap()));
    assert!(snapshot.bids.is_empty());

    let symbols: Vec<String> = client
        .get(format!("{base}/exchange/symbols"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(symbols, vec!["AAPL".to_string()]);
}

#[tokio::test]
async fn crossing_orders_report_fills() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/orders"))
        .json(&json!({
            "cl_ord_id": "s1",
            "symbol": "AAPL",
            "side": "SELL",
            "order_type": "LIMIT",
            "price": "10.00",
            "quantity": 100
        }))
        .send()
        .await
        .unwrap();

    let reports: Vec<ExecutionReport> = client
        .post(format!("{base}/orders"))
        .json(&json!({
            "cl_ord_id": "b1",
            "symbol": "AAPL",
            "side": "BUY",
            "order_type": "LIMIT",
            "price": "10.00",
            "quantity": 60
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);

    let aggressor = &reports[1];
    assert_eq!(aggressor.cl_ord_id, "b1");
    assert_eq!(aggressor.exec_type, ExecType::Fill);
    assert_eq!(aggressor.last_qty, Some(60));
    assert_eq!(aggressor.last_px, Some(Price::parse("10.00").unwrap()));
    assert_eq!(aggressor.avg_px, Price::parse("10.00").unwrap());

    let passive = &reports[2];
    assert_eq!(passive.cl_ord_id, "s1");
    assert_eq!(passive.exec_type, ExecType::PartialFill);
    assert_eq!(passive.leaves_qty, 40);
    assert_eq!(passive.order_status, OrderStatus::PartiallyFilled);
}

#[tokio::test]
async fn cancel_of_unknown_order_is_a_rejected_report() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/orders/cancel"))
        .json(&json!({
            "symbol": "AAPL",
            "orig_cl_ord_id": "nope",
            "cl_ord_id": "c1"
        }))
        .send()
        .await
        .unwrap();

    // Order-entry failures are reports, not HTTP errors
    assert!(response.status().is_success());

    let report: ExecutionReport = response.json().await.unwrap();
    assert_eq!(report.exec_type, ExecType::Rejected);
    assert_eq!(report.order_status, OrderStatus::Rejected);
    assert_eq!(report.orig_cl_ord_id.as_deref(), Some("nope"));
    assert!(report.order_id.is_none());
}

#[tokio::test]
async fn amend_replaces_resting_order() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/orders"))
        .json(&json!({
            "cl_ord_id": "b1",
            "symbol": "AAPL",
            "side": "BUY",
            "order_type": "LIMIT",
            "price": "10.00",
            "quantity": 50
        }))
        .send()
        .await
        .unwrap();

    let reports: Vec<ExecutionReport> = client
        .post(format!("{base}/orders/amend"))
        .json(&json!({
            "symbol": "AAPL",
            "orig_cl_ord_id": "b1",
            "cl_ord_id": "b2",
            "quantity": 80
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].exec_type, ExecType::Replaced);
    assert_eq!(reports[0].leaves_qty, 80);
    assert_eq!(reports[0].orig_cl_ord_id.as_deref(), Some("b1"));

    let snapshot: BookSnapshot = client
        .get(format!("{base}/exchange/orderbook/AAPL"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot.bids.len(), 1);
    assert_eq!(snapshot.bids[0].quantity, 80);
}

#[tokio::test]
async fn setup_rejected_when_provider_disabled() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/liquidity/setup/AAPL"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn liquidity_status_reports_disabled_provider() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let status: serde_json::Value = client
        .get(format!("{base}/liquidity/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(status["enabled"], serde_json::Value::Bool(false));
    assert!(status["active_symbols"].as_array().unwrap().is_empty());
}
