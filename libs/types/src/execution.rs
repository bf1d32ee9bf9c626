//! Execution reports
//!
//! An [`Execution`] is an immutable record of one order-state transition
//! and is the engine's only visible output: acknowledgements, fills,
//! cancels, replaces and rejects are all expressed this way.

use crate::ids::{ExecId, OrderId, Symbol};
use crate::numeric::Price;
use crate::order::{OrderStatus, Side};
use serde::{Deserialize, Serialize};

/// Execution type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    New,
    PartialFill,
    Fill,
    Cancelled,
    Replaced,
    Rejected,
}

/// One order-state transition
///
/// `order_id` and `side` are absent on rejects for orders the engine never
/// knew about (cancel or amend of an unknown client order id).
/// `orig_cl_ord_id` is set only on cancel and amend responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub exec_id: ExecId,
    pub order_id: Option<OrderId>,
    pub cl_ord_id: String,
    pub orig_cl_ord_id: Option<String>,
    pub symbol: Symbol,
    pub side: Option<Side>,
    /// Trade price; zero unless this execution is a fill or a replace
    pub exec_price: Price,
    /// Traded quantity; zero unless this execution is a fill
    pub exec_quantity: u64,
    /// Order's remaining quantity after this event
    pub leaves_qty: u64,
    /// Order's filled quantity after this event
    pub cum_qty: u64,
    pub exec_type: ExecType,
    pub order_status: OrderStatus,
    /// Unix nanos
    pub transact_time: i64,
}

impl Execution {
    /// Whether this execution represents a trade
    pub fn is_fill(&self) -> bool {
        self.exec_quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ExecType::PartialFill).unwrap(),
            "\"PARTIAL_FILL\""
        );
        assert_eq!(
            serde_json::to_string(&ExecType::Replaced).unwrap(),
            "\"REPLACED\""
        );
    }

    #[test]
    fn test_is_fill() {
        let exec = Execution {
            exec_id: ExecId::new(1),
            order_id: Some(OrderId::new(1)),
            cl_ord_id: "C-1".into(),
            orig_cl_ord_id: None,
            symbol: Symbol::new("AAPL"),
            side: Some(Side::Buy),
            exec_price: Price::ZERO,
            exec_quantity: 0,
            leaves_qty: 100,
            cum_qty: 0,
            exec_type: ExecType::New,
            order_status: OrderStatus::New,
            transact_time: 0,
        };
        assert!(!exec.is_fill());

        let fill = Execution {
            exec_quantity: 25,
            exec_type: ExecType::PartialFill,
            ..exec
        };
        assert!(fill.is_fill());
    }
}
