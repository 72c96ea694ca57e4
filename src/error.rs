//! Error types for the relay pipeline.
//!
//! Each network leg has its own error enum; [`RelayError`] is transparent over
//! both, so the trigger sees the underlying failure exactly as it was raised.

use thiserror::Error;

/// Failure while fetching the upstream carbon intensity window.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout, or body read failure.
    #[error("carbon intensity request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was not JSON, or not the regional intensity shape.
    #[error("carbon intensity response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure while posting metric points to the sink.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("metrics post failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metric points could not be serialized: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Terminal failure of one relay invocation.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Post(#[from] PostError),
}
