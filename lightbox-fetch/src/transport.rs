//! The transport seam and its reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use lightbox_core::ApiError;
use reqwest::Client;
use tracing::{debug, warn};

use crate::request::{ApiRequest, Method};

/// Default request timeout in seconds.
///
/// The underlying transport default is the only timeout in the system;
/// no per-operation timeouts or retry policies exist anywhere above it.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Lightbox.
const USER_AGENT: &str = concat!("lightbox/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Transport trait
// ============================================================================

/// A raw HTTP response before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: Vec<u8>,
}

/// The seam between the API client and the network.
///
/// Production code uses [`HttpTransport`]; tests substitute a scripted
/// implementation to exercise the sync services without a server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] for network-level failures. Status
    /// code classification is the caller's job.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

// ============================================================================
// HttpTransport
// ============================================================================

/// reqwest-backed transport with the stock timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be
    /// built, which indicates a broken TLS configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be
    /// built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.inner.get(request.url.clone()),
            Method::Post => self.inner.post(request.url.clone()),
            Method::Delete => self.inner.delete(request.url.clone()),
        };

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }
        builder = builder.header(reqwest::header::ACCEPT, "application/json");

        debug!(method = request.method.as_str(), url = %request.url, "Executing request");

        let response = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "Transport failure");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "Failed to read response body");
                ApiError::Transport(e.to_string())
            })?
            .to_vec();

        debug!(status, bytes = body.len(), "Response received");

        Ok(RawResponse { status, body })
    }
}
