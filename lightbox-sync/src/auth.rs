//! OAuth code-grant flow: browser-side helpers and the token exchange.
//!
//! The browser half builds the authorization URL and recognizes the
//! native callback redirect carrying a `code` query item. The native half
//! exchanges that code for a bearer token, exactly once per code, and
//! persists it before the caller sees it.

use std::sync::{Arc, Mutex, MutexGuard};

use lightbox_core::config::NATIVE_CALLBACK_PATH;
use lightbox_core::models::{AccessToken, TokenResponseDto};
use lightbox_core::{ApiConfig, ApiError};
use lightbox_fetch::{ApiClient, ApiRequest};
use lightbox_store::SecretStore;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use url::Url;

// ============================================================================
// Browser-flow helpers
// ============================================================================

/// Builds the code-grant authorization URL to open in a browser.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when the configured authorize
/// endpoint is not a valid URL.
pub fn authorize_url(config: &ApiConfig) -> Result<Url, ApiError> {
    let mut url = Url::parse(&config.authorize_url)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid authorize URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.access_key)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.access_scope);
    Ok(url)
}

/// Extracts the authorization code from a navigation URL.
///
/// Returns `Some(code)` only for a redirect to the fixed native callback
/// path carrying a `code` query item; any other navigation yields `None`
/// and is expected to proceed normally.
pub fn extract_code(url: &Url) -> Option<String> {
    if url.path() != NATIVE_CALLBACK_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
}

// ============================================================================
// OAuthService
// ============================================================================

struct Inflight {
    code: String,
    abort: AbortHandle,
}

#[derive(Default)]
struct Inner {
    generation: u64,
    inflight: Option<Inflight>,
}

/// Exchanges an authorization code for a bearer token.
///
/// Single-flight by code: a second call with the code already in flight
/// fails fast with [`ApiError::RequestAlreadyInProgress`] (codes are
/// single-use server-side, so a duplicate submission could only fail
/// later anyway). A call with a *different* code supersedes the in-flight
/// exchange; the newer code wins and the old caller observes
/// [`ApiError::Cancelled`].
pub struct OAuthService {
    client: ApiClient,
    config: Arc<ApiConfig>,
    secrets: Arc<dyn SecretStore>,
    inner: Mutex<Inner>,
}

impl OAuthService {
    /// Creates the service.
    pub fn new(client: ApiClient, config: Arc<ApiConfig>, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            client,
            config,
            secrets,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("auth state lock poisoned")
    }

    /// Exchanges `code` for a bearer token and persists it.
    ///
    /// On success the token is written to the secret store *before* this
    /// returns. On any failure the store is left untouched.
    ///
    /// # Errors
    ///
    /// [`ApiError::RequestAlreadyInProgress`] when the same code is
    /// already being exchanged, [`ApiError::Cancelled`] when a newer code
    /// superseded this call, [`ApiError::Storage`] when persisting fails,
    /// plus the usual transport/status/decoding failures.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, ApiError> {
        let (generation, task) = {
            let mut inner = self.lock();
            if let Some(flight) = &inner.inflight {
                if flight.code == code {
                    debug!("Exchange already in progress for this code");
                    return Err(ApiError::RequestAlreadyInProgress);
                }
                // A different code supersedes the in-flight exchange.
                flight.abort.abort();
                inner.inflight = None;
            }
            inner.generation = inner.generation.wrapping_add(1);
            let request = self.token_request(code)?;
            let client = self.client.clone();
            let task =
                tokio::spawn(async move { client.fetch_json::<TokenResponseDto>(request).await });
            inner.inflight = Some(Inflight {
                code: code.to_string(),
                abort: task.abort_handle(),
            });
            (inner.generation, task)
        };

        let result = match task.await {
            Ok(result) => result,
            // Aborted mid-flight by a superseding exchange.
            Err(_) => return Err(ApiError::Cancelled),
        };

        {
            let mut inner = self.lock();
            if inner.generation != generation {
                // A newer exchange owns the slot; this completion is stale.
                return Err(ApiError::Cancelled);
            }
            inner.inflight = None;
        }

        match result {
            Ok(body) => {
                let token = body.access_token;
                // Persist before handing the token to the caller.
                self.secrets
                    .set_token(&token)
                    .map_err(|e| ApiError::Storage(e.to_string()))?;
                debug!("Authorization code exchanged and token persisted");
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Token exchange failed");
                Err(e)
            }
        }
    }

    fn token_request(&self, code: &str) -> Result<ApiRequest, ApiError> {
        let url = Url::parse(&self.config.token_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid token URL: {e}")))?;
        let form = vec![
            ("client_id".to_string(), self.config.access_key.clone()),
            ("client_secret".to_string(), self.config.secret_key.clone()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("code".to_string(), code.to_string()),
            ("grant_type".to_string(), "authorization_code".to_string()),
        ];
        Ok(ApiRequest::post(url).form(form))
    }
}

// ============================================================================
// Tests
// ============================================================================
