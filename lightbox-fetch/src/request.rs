//! Transport-agnostic request model.

use lightbox_core::ApiError;
use url::Url;

// ============================================================================
// Method
// ============================================================================

/// HTTP methods used by the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// DELETE request.
    Delete,
}

impl Method {
    /// Returns the method as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

// ============================================================================
// ApiRequest
// ============================================================================

/// A fully-described API request, independent of any HTTP library.
///
/// Keeping this free of reqwest types lets the [`crate::Transport`] trait
/// stay object-safe and lets tests script responses without a server.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Bearer token for the `Authorization` header, if authenticated.
    pub bearer: Option<String>,
    /// Form-encoded body, if any.
    pub form: Option<Vec<(String, String)>>,
}

impl ApiRequest {
    /// Creates a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    /// Creates a DELETE request.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::Delete, url)
    }

    fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer: None,
            form: None,
        }
    }

    /// Attaches a bearer token.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Attaches a form-encoded body.
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    /// Returns the request path, for logging and test matching.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

// ============================================================================
// URL construction
// ============================================================================

/// Joins a path onto an API base URL.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when the base or the joined result
/// is not a valid URL. Nothing is sent in that case.
pub fn api_url(base: &str, path: &str) -> Result<Url, ApiError> {
    let base = Url::parse(base)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL {base}: {e}")))?;
    base.join(path)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid path {path}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
