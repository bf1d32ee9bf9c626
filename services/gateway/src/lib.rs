//! HTTP gateway for the exchange simulator
//!
//! Translates JSON order-entry requests into engine calls and execution
//! reports back out, and exposes read-only inspection of the books and
//! the liquidity subsystem. The binary in `main.rs` wires configuration,
//! tracing and the periodic quote-refresh task around this.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
