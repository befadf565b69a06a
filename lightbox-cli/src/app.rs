//! Wiring of the sync core for CLI use.

use std::sync::Arc;

use anyhow::{Context, Result};
use lightbox_core::ApiConfig;
use lightbox_fetch::ApiClient;
use lightbox_store::{default_settings_path, load_or_default, KeychainSecretStore, SecretStore};
use lightbox_sync::{
    AvatarService, BusyGuard, FeedSyncEngine, NoWebSession, OAuthService, ProfileService,
    SessionCoordinator,
};
use tracing::debug;

/// The fully wired sync core plus the pieces commands talk to directly.
pub struct App {
    /// API configuration after settings and env resolution.
    pub config: Arc<ApiConfig>,
    /// Session orchestration.
    pub coordinator: SessionCoordinator,
    /// Avatar snapshot access.
    pub avatar: Arc<AvatarService>,
    /// Feed commands and snapshots.
    pub feed: Arc<FeedSyncEngine>,
    /// Blocking-indicator guard around interactive operations.
    pub busy: BusyGuard,
}

impl App {
    /// Loads settings and constructs every service.
    ///
    /// Components are built here, once, and handed to the coordinator by
    /// reference; nothing in the core is a global.
    pub async fn bootstrap() -> Result<Self> {
        let settings_path = default_settings_path().context("resolving settings path")?;
        let settings = load_or_default(&settings_path)
            .await
            .with_context(|| format!("loading settings from {}", settings_path.display()))?;
        let config = Arc::new(settings.resolved_api());
        debug!(base_url = %config.base_url, "Configuration resolved");

        let client = ApiClient::http().context("building HTTP client")?;
        let secrets: Arc<dyn SecretStore> = Arc::new(KeychainSecretStore::new());

        let oauth = Arc::new(OAuthService::new(
            client.clone(),
            config.clone(),
            secrets.clone(),
        ));
        let profile = Arc::new(ProfileService::new(client.clone(), config.clone()));
        let avatar = Arc::new(AvatarService::new(
            client.clone(),
            config.clone(),
            secrets.clone(),
        ));
        let feed = Arc::new(FeedSyncEngine::new(client, config.clone(), secrets.clone()));
        let coordinator = SessionCoordinator::new(
            oauth,
            profile,
            avatar.clone(),
            feed.clone(),
            secrets,
            Arc::new(NoWebSession),
        );

        Ok(Self {
            config,
            coordinator,
            avatar,
            feed,
            busy: BusyGuard::new(),
        })
    }
}
