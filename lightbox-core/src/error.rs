//! Core error taxonomy for Lightbox API operations.

use thiserror::Error;

/// Error type shared by the fetch and sync layers.
///
/// Every network-facing operation in Lightbox resolves to one of these
/// variants. [`ApiError::Cancelled`] is benign everywhere it is checked
/// and is never surfaced to a user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, TLS, connection reset, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response arrived with a status code outside `[200, 300)`.
    #[error("HTTP status code {0}")]
    HttpStatus(u16),

    /// Success status but no payload where one was expected.
    #[error("Empty response body")]
    EmptyBody,

    /// Response payload could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(#[from] serde_json::Error),

    /// The request could not be constructed locally; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An exchange for the same authorization code is already in flight.
    #[error("Request already in progress")]
    RequestAlreadyInProgress,

    /// The request was superseded or reset before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The secret store rejected a token read or write.
    #[error("Secret storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Returns true if this error is a cancellation.
    ///
    /// Cancellations are treated as a no-op by every caller: a superseded
    /// request's completion must not mutate state or reach the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Returns true if this error is an HTTP 401.
    ///
    /// A 401 on the profile-fetch path is the only status code with
    /// special-cased handling: it forces a logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::HttpStatus(401))
    }
}
