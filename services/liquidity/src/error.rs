//! Remote-fetch error taxonomy
//!
//! These never reach a trading client; callers log them and fall back.

use thiserror::Error;

/// Why a quote or profile fetch produced nothing usable
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("no API key configured")]
    NoApiKey,

    #[error("rate limit reached")]
    RateLimited,

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no valid price in response")]
    NoPrice,
}
