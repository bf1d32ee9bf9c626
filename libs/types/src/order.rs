//! Order lifecycle types
//!
//! An [`OrderRequest`] is what a session (or the liquidity provider)
//! submits; the engine turns it into an [`Order`] by assigning the exchange
//! id and stamping the creation time. Orders rest in a book only while
//! non-terminal with remaining quantity.

use crate::ids::{OrderId, Symbol};
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type
///
/// Market orders execute against whatever liquidity is present and never
/// rest; limit orders cross only at their price or better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

/// Order status
///
/// `Filled`, `Cancelled` and `Rejected` are terminal: once reached, the
/// order never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// A request to place an order, before the engine has accepted it
///
/// `price` is required for limit orders and ignored for market orders.
/// The comp ids identify the submitting session and are copied onto the
/// resulting order untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub cl_ord_id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<Price>,
    pub quantity: u64,
    pub sender_comp_id: String,
    pub target_comp_id: String,
}

/// A live order as tracked by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub cl_ord_id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price; zero for market orders
    pub price: Price,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub remaining_quantity: u64,
    pub status: OrderStatus,
    pub sender_comp_id: String,
    pub target_comp_id: String,
    /// Unix nanos
    pub created_at: i64,
}

impl Order {
    /// Accept a request: assign the exchange id, zero the fills, stamp time
    pub fn accept(request: OrderRequest, order_id: OrderId, now: i64) -> Self {
        Self {
            order_id,
            cl_ord_id: request.cl_ord_id,
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            price: request.price.unwrap_or(Price::ZERO),
            quantity: request.quantity,
            filled_quantity: 0,
            remaining_quantity: request.quantity,
            status: OrderStatus::New,
            sender_comp_id: request.sender_comp_id,
            target_comp_id: request.target_comp_id,
            created_at: now,
        }
    }

    /// filled + remaining = original, at every observable moment
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity + self.remaining_quantity == self.quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    pub fn has_fills(&self) -> bool {
        self.filled_quantity > 0
    }

    /// Apply a fill and move the status forward
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, fill_quantity: u64) {
        assert!(
            fill_quantity <= self.remaining_quantity,
            "Fill would exceed order quantity"
        );

        self.filled_quantity += fill_quantity;
        self.remaining_quantity -= fill_quantity;

        self.status = if self.remaining_quantity == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };

        debug_assert!(self.check_invariant());
    }
}
