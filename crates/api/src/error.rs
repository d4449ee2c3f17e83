//! Error types for the API client.

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) operations.
///
/// There is no retry and no distinction between client and server failures
/// beyond the status code; callers surface these as a single failed
/// operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
