//! Order entry: new, cancel, amend
//!
//! Every response is a sequence of execution reports; rejected operations
//! come back as a report too, never as an HTTP error.

use crate::models::{AmendOrderRequest, CancelOrderRequest, ExecutionReport, NewOrderRequest};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use types::ids::Symbol;

pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<NewOrderRequest>,
) -> Json<Vec<ExecutionReport>> {
    let executions = state
        .engine
        .lock()
        .await
        .submit_order(payload.into_order_request())
        .await;

    Json(executions.into_iter().map(ExecutionReport::from).collect())
}

pub async fn cancel(
    State(state): State<AppState>,
    Json(payload): Json<CancelOrderRequest>,
) -> Json<ExecutionReport> {
    let execution = state.engine.lock().await.cancel_order(
        &Symbol::new(payload.symbol),
        &payload.orig_cl_ord_id,
        &payload.cl_ord_id,
    );

    Json(ExecutionReport::from(execution))
}

pub async fn amend(
    State(state): State<AppState>,
    Json(payload): Json<AmendOrderRequest>,
) -> Json<Vec<ExecutionReport>> {
    let executions = state.engine.lock().await.amend_order(
        &Symbol::new(payload.symbol),
        &payload.orig_cl_ord_id,
        &payload.cl_ord_id,
        payload.quantity,
        payload.price,
    );

    Json(executions.into_iter().map(ExecutionReport::from).collect())
}
