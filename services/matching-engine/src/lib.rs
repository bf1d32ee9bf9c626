//! Matching engine
//!
//! Per-symbol order books under strict price-time priority, driven by a
//! single engine that owns every book and both id counters. Every state
//! transition of every order is emitted as an execution report; there is
//! no other output channel.
//!
//! Books are created on first use. Before an incoming order matches, the
//! liquidity provider may seed the symbol's book with a fan of maker
//! quotes; those post through the same submit path as client flow.

pub mod book;
pub mod engine;

pub use book::OrderBook;
pub use engine::MatchingEngine;
