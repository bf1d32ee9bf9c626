//! Wire models for the order-entry and inspection endpoints

use serde::{Deserialize, Serialize};
use types::execution::{ExecType, Execution};
use types::ids::{ExecId, OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, OrderRequest, OrderStatus, OrderType, Side};

fn default_sender() -> String {
    "REST-CLIENT".to_string()
}

fn default_target() -> String {
    "EXCHANGE".to_string()
}

/// Inbound new-order message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewOrderRequest {
    pub cl_ord_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Option<Price>,
    pub quantity: u64,
    #[serde(default = "default_sender")]
    pub sender_comp_id: String,
    #[serde(default = "default_target")]
    pub target_comp_id: String,
}

impl NewOrderRequest {
    pub fn into_order_request(self) -> OrderRequest {
        OrderRequest {
            cl_ord_id: self.cl_ord_id,
            symbol: Symbol::new(self.symbol),
            side: self.side,
            order_type: self.order_type,
            price: self.price,
            quantity: self.quantity,
            sender_comp_id: self.sender_comp_id,
            target_comp_id: self.target_comp_id,
        }
    }
}

/// Inbound cancel-request message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub orig_cl_ord_id: String,
    pub cl_ord_id: String,
}

/// Inbound amend-request message; omitted fields keep their old values
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AmendOrderRequest {
    pub symbol: String,
    pub orig_cl_ord_id: String,
    pub cl_ord_id: String,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub price: Option<Price>,
}

/// Outbound execution report
///
/// `avg_px` is the last fill price when this report is a fill and zero
/// otherwise; `last_qty`/`last_px` appear only on fills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub exec_id: ExecId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub cl_ord_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_cl_ord_id: Option<String>,
    pub symbol: Symbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub exec_type: ExecType,
    pub order_status: OrderStatus,
    pub leaves_qty: u64,
    pub cum_qty: u64,
    pub avg_px: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_qty: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_px: Option<Price>,
    pub transact_time: i64,
}

impl From<Execution> for ExecutionReport {
    fn from(execution: Execution) -> Self {
        let is_fill = execution.is_fill();
        Self {
            exec_id: execution.exec_id,
            order_id: execution.order_id,
            cl_ord_id: execution.cl_ord_id,
            orig_cl_ord_id: execution.orig_cl_ord_id,
            symbol: execution.symbol,
            side: execution.side,
            exec_type: execution.exec_type,
            order_status: execution.order_status,
            leaves_qty: execution.leaves_qty,
            cum_qty: execution.cum_qty,
            avg_px: if is_fill {
                execution.exec_price
            } else {
                Price::ZERO
            },
            last_qty: is_fill.then_some(execution.exec_quantity),
            last_px: is_fill.then_some(execution.exec_price),
            transact_time: execution.transact_time,
        }
    }
}

/// One resting order in a book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookOrder {
    pub order_id: OrderId,
    pub price: Price,
    pub quantity: u64,
    pub side: Side,
}

impl From<&Order> for BookOrder {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            price: order.price,
            quantity: order.remaining_quantity,
            side: order.side,
        }
    }
}

/// Book snapshot down to a requested depth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<BookOrder>,
    pub asks: Vec<BookOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_bid: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_ask: Option<Price>,
}

/// Result of a manual liquidity setup call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupResponse {
    pub symbol: Symbol,
    pub seeded: bool,
    pub has_liquidity: bool,
}

/// A fetched or cached reference price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    pub symbol: Symbol,
    pub price: Price,
}
