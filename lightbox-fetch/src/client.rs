//! Outcome classification shared by every service.

use std::sync::Arc;

use lightbox_core::ApiError;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::request::ApiRequest;
use crate::transport::{HttpTransport, Transport};

/// API client that classifies transport outcomes uniformly.
///
/// Every completion falls into exactly one bucket: transport failure,
/// out-of-window status code, empty body, or a decoding failure surfaced
/// by [`ApiClient::fetch_json`]. There are no retries at this layer.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Creates a client over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a client over the stock HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn http() -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new()?)))
    }

    /// Executes a request and returns the raw body of a 2xx response.
    ///
    /// # Errors
    ///
    /// [`ApiError::Transport`] for network failures,
    /// [`ApiError::HttpStatus`] for any status outside `[200, 300)`.
    pub async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        let response = self.transport.execute(&request).await?;

        if !(200..300).contains(&response.status) {
            warn!(
                url = %request.url,
                status = response.status,
                "Request failed with HTTP status"
            );
            return Err(ApiError::HttpStatus(response.status));
        }

        Ok(response.body)
    }

    /// Executes a request and decodes its JSON body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::execute`] returns, plus
    /// [`ApiError::EmptyBody`] for a 2xx with no payload and
    /// [`ApiError::Decoding`] when the payload does not parse.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let url = request.url.clone();
        let body = self.execute(request).await?;

        if body.is_empty() {
            warn!(url = %url, "Expected a payload but the body was empty");
            return Err(ApiError::EmptyBody);
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(
                url = %url,
                error = %e,
                payload = %String::from_utf8_lossy(&body),
                "Failed to decode response"
            );
            ApiError::Decoding(e)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
