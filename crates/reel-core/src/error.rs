//! Error types for the discovery pipeline.
//!
//! Both kinds are logged by their callers and never abort the event loop.

use reqwest::StatusCode;
use thiserror::Error;

/// Transport-level failure while talking to the movie catalog.
///
/// Covers network errors, undecodable bodies and non-success HTTP statuses.
/// A payload that decodes fine but flags `Response: "False"` is not a
/// `FetchError`; see [`crate::search::SearchOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("movie API returned status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum TrendingStoreError {
    #[error("store file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("store is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("trending worker has shut down")]
    Closed,
}
