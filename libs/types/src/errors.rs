//! Reject taxonomy
//!
//! Client-visible failures never raise errors out of the engine; they
//! surface as a single `Rejected` execution. The reason is for the log
//! line only — reports carry no reason field.

use thiserror::Error;

/// Why a client operation was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("unknown symbol")]
    UnknownSymbol,

    #[error("order not found")]
    OrderNotFound,

    #[error("new quantity {new_qty} less than filled quantity {filled}")]
    QuantityBelowFilled { new_qty: u64, filled: u64 },

    #[error("client order id is required")]
    MissingClOrdId,

    #[error("symbol is required")]
    MissingSymbol,

    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("limit orders require a positive price")]
    MissingLimitPrice,

    #[error("no counter liquidity")]
    NoCounterLiquidity,
}
