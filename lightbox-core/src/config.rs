//! API endpoint and client configuration.

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// REST API root.
const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Browser authorization endpoint (code grant).
const DEFAULT_AUTHORIZE_URL: &str = "https://unsplash.com/oauth/authorize";

/// Token exchange endpoint.
const DEFAULT_TOKEN_URL: &str = "https://unsplash.com/oauth/token";

/// Native redirect URI registered for the client.
const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Scopes requested during authorization, space-separated per RFC 6749.
const DEFAULT_ACCESS_SCOPE: &str = "public read_user write_likes";

/// Feed page size.
const DEFAULT_PER_PAGE: u32 = 10;

/// Feed ordering.
const DEFAULT_ORDER_BY: &str = "latest";

/// Path of the native callback the authorization flow redirects to.
///
/// A navigation to this path carrying a `code` query item completes the
/// browser half of the login flow; any other navigation proceeds normally.
pub const NATIVE_CALLBACK_PATH: &str = "/oauth/authorize/native";

// ============================================================================
// ApiConfig
// ============================================================================

/// Endpoints, client credentials, and paging defaults.
///
/// Credentials default to empty and are expected to come from settings or
/// the `LIGHTBOX_ACCESS_KEY` / `LIGHTBOX_SECRET_KEY` /
/// `LIGHTBOX_REDIRECT_URI` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// OAuth client id.
    pub access_key: String,
    /// OAuth client secret.
    pub secret_key: String,
    /// Redirect URI registered for the client.
    pub redirect_uri: String,
    /// REST API root.
    pub base_url: String,
    /// Browser authorization endpoint.
    pub authorize_url: String,
    /// Token exchange endpoint.
    pub token_url: String,
    /// Scopes requested during authorization.
    pub access_scope: String,
    /// Feed page size.
    pub per_page: u32,
    /// Feed ordering.
    pub order_by: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            access_scope: DEFAULT_ACCESS_SCOPE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            order_by: DEFAULT_ORDER_BY.to_string(),
        }
    }
}

impl ApiConfig {
    /// Applies environment variable overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("LIGHTBOX_ACCESS_KEY") {
            self.access_key = key;
        }
        if let Ok(secret) = std::env::var("LIGHTBOX_SECRET_KEY") {
            self.secret_key = secret;
        }
        if let Ok(uri) = std::env::var("LIGHTBOX_REDIRECT_URI") {
            self.redirect_uri = uri;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_endpoints() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.unsplash.com");
        assert_eq!(config.token_url, "https://unsplash.com/oauth/token");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.order_by, "latest");
        assert!(config.access_key.is_empty());
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = ApiConfig {
            access_key: "ak".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ApiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.access_key, "ak");
        assert_eq!(back.base_url, config.base_url);
    }
}
