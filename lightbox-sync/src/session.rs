//! Login, session restore, and logout sequencing.

use std::sync::Arc;

use lightbox_core::models::Profile;
use lightbox_core::ApiError;
use lightbox_store::SecretStore;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::OAuthService;
use crate::avatar::AvatarService;
use crate::feed::FeedSyncEngine;
use crate::profile::ProfileService;
use crate::web_session::WebSession;

// ============================================================================
// Session state
// ============================================================================

/// Authentication lifecycle of the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No valid token; the login flow must run.
    #[default]
    Unauthenticated,
    /// A token exchange or profile validation is underway.
    Authenticating,
    /// Token validated; the main surface can be shown.
    Authenticated,
}

// ============================================================================
// SessionCoordinator
// ============================================================================

/// Orchestrates login, session restore, and logout across the services.
///
/// The coordinator owns no network state of its own; it sequences the
/// explicitly constructed services handed to it and publishes the
/// [`SessionState`] on a watch channel for the UI collaborator.
pub struct SessionCoordinator {
    oauth: Arc<OAuthService>,
    profile: Arc<ProfileService>,
    avatar: Arc<AvatarService>,
    feed: Arc<FeedSyncEngine>,
    secrets: Arc<dyn SecretStore>,
    web_session: Arc<dyn WebSession>,
    state: watch::Sender<SessionState>,
}

impl SessionCoordinator {
    /// Creates the coordinator over already-constructed services.
    pub fn new(
        oauth: Arc<OAuthService>,
        profile: Arc<ProfileService>,
        avatar: Arc<AvatarService>,
        feed: Arc<FeedSyncEngine>,
        secrets: Arc<dyn SecretStore>,
        web_session: Arc<dyn WebSession>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            oauth,
            profile,
            avatar,
            feed,
            secrets,
            web_session,
            state,
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribes to session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Runs the full login sequence for a fresh authorization code.
    ///
    /// Exchange → profile fetch → fire-and-forget avatar fetch and feed
    /// init → `Authenticated`.
    ///
    /// # Errors
    ///
    /// Exchange or profile failures propagate; see
    /// [`SessionCoordinator::restore_session`] for how profile failures
    /// map onto state.
    pub async fn login(&self, code: &str) -> Result<Profile, ApiError> {
        self.state.send_replace(SessionState::Authenticating);

        let token = match self.oauth.exchange_code(code).await {
            Ok(token) => token,
            Err(e) => {
                // A superseding login already owns the state machine.
                if !e.is_cancelled() {
                    self.state.send_replace(SessionState::Unauthenticated);
                }
                return Err(e);
            }
        };

        self.promote(&token).await
    }

    /// Restores a persisted session at process start.
    ///
    /// With no stored token this resolves to `Unauthenticated` without
    /// ever touching the profile service. With a token it runs the same
    /// validate-then-promote sequence as a fresh login.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] when the secret store is unavailable, plus
    /// whatever the profile fetch surfaces.
    pub async fn restore_session(&self) -> Result<Option<Profile>, ApiError> {
        let token = self
            .secrets
            .get_token()
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        let Some(token) = token else {
            debug!("No stored token, staying unauthenticated");
            self.state.send_replace(SessionState::Unauthenticated);
            return Ok(None);
        };

        self.state.send_replace(SessionState::Authenticating);
        self.promote(&token).await.map(Some)
    }

    /// Tears the session down.
    ///
    /// Clears the token, resets every service (each cancels its own
    /// in-flight work), clears web-session cookies, and returns to
    /// `Unauthenticated`. Safe to call at any time.
    pub fn logout(&self) {
        if let Err(e) = self.secrets.delete_token() {
            warn!(error = %e, "Failed to clear token on logout");
        }
        self.profile.reset();
        self.avatar.reset();
        self.feed.reset();
        self.web_session.clear_cookies();
        self.state.send_replace(SessionState::Unauthenticated);
        debug!("Session torn down");
    }

    /// Validates `token` via the profile fetch and promotes the session.
    async fn promote(&self, token: &str) -> Result<Profile, ApiError> {
        match self.profile.fetch(token).await {
            Ok(profile) => {
                self.spawn_avatar_fetch(&profile.username);
                self.spawn_feed_init();
                self.state.send_replace(SessionState::Authenticated);
                Ok(profile)
            }
            // Superseded validation: a newer attempt owns the state.
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) if e.is_unauthorized() => {
                // Stale or revoked token: forced logout.
                warn!("Profile fetch answered 401, clearing token");
                if let Err(store_err) = self.secrets.delete_token() {
                    warn!(error = %store_err, "Failed to clear rejected token");
                }
                self.state.send_replace(SessionState::Unauthenticated);
                Err(e)
            }
            Err(e) => {
                // Transient failure: the token may still be good, so it
                // stays in place for the next attempt.
                warn!(error = %e, "Profile fetch failed");
                self.state.send_replace(SessionState::Unauthenticated);
                Err(e)
            }
        }
    }

    /// Avatar fetch never blocks entering the authenticated state.
    fn spawn_avatar_fetch(&self, username: &str) {
        let avatar = Arc::clone(&self.avatar);
        let username = username.to_string();
        tokio::spawn(async move {
            if let Err(e) = avatar.fetch(&username).await {
                if !e.is_cancelled() {
                    warn!(username, error = %e, "Avatar fetch failed");
                }
            }
        });
    }

    /// First feed page load; failures surface later through the feed's
    /// own retry path.
    fn spawn_feed_init(&self) {
        let feed = Arc::clone(&self.feed);
        tokio::spawn(async move {
            if feed.last_loaded_page().is_none() {
                if let Err(e) = feed.fetch_next_page().await {
                    if !e.is_cancelled() {
                        warn!(error = %e, "Initial feed page fetch failed");
                    }
                }
            }
        });
    }
}
