//! Authenticated-user profile fetching.

use std::sync::{Arc, Mutex, MutexGuard};

use lightbox_core::models::{Profile, ProfileDto};
use lightbox_core::{ApiConfig, ApiError};
use lightbox_fetch::{api_url, ApiClient, ApiRequest};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Inner {
    profile: Option<Profile>,
    generation: u64,
    inflight: Option<AbortHandle>,
}

/// Fetches and caches the authenticated user's profile.
///
/// Single-flight with cancel-then-replace semantics: a new `fetch`
/// unconditionally cancels any in-flight request, so the latest call
/// always wins. A successful fetch replaces the stored profile wholesale
/// and notifies subscribers; a failed fetch leaves the previous value
/// untouched and stays silent.
pub struct ProfileService {
    client: ApiClient,
    config: Arc<ApiConfig>,
    inner: Mutex<Inner>,
    notify: watch::Sender<u64>,
}

impl ProfileService {
    /// Creates the service.
    pub fn new(client: ApiClient, config: Arc<ApiConfig>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            client,
            config,
            inner: Mutex::new(Inner::default()),
            notify,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("profile state lock poisoned")
    }

    /// Returns the current profile snapshot.
    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    /// Subscribes to change notifications.
    ///
    /// The channel carries a version counter; read
    /// [`ProfileService::profile`] for the current snapshot when it bumps.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Fetches the profile for `token`, superseding any in-flight fetch.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] when a newer fetch or a reset superseded
    /// this call, plus the usual transport/status/decoding failures.
    pub async fn fetch(&self, token: &str) -> Result<Profile, ApiError> {
        let (generation, task) = {
            let mut inner = self.lock();
            // The latest call always wins, even for the same token.
            if let Some(handle) = inner.inflight.take() {
                handle.abort();
            }
            inner.generation = inner.generation.wrapping_add(1);
            let url = api_url(&self.config.base_url, "/me")?;
            let request = ApiRequest::get(url).bearer(token);
            let client = self.client.clone();
            let task = tokio::spawn(async move { client.fetch_json::<ProfileDto>(request).await });
            inner.inflight = Some(task.abort_handle());
            (inner.generation, task)
        };

        let result = match task.await {
            Ok(result) => result,
            Err(_) => return Err(ApiError::Cancelled),
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            return Err(ApiError::Cancelled);
        }
        inner.inflight = None;

        match result {
            Ok(dto) => {
                let profile = Profile::from(dto);
                inner.profile = Some(profile.clone());
                drop(inner);
                debug!(username = %profile.username, "Profile updated");
                self.notify.send_modify(|version| *version += 1);
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Profile fetch failed");
                Err(e)
            }
        }
    }

    /// Cancels any in-flight fetch and clears the stored profile.
    ///
    /// The logout path: no notification is emitted, and a completion that
    /// still lands afterwards is dropped by the generation check.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if let Some(handle) = inner.inflight.take() {
            handle.abort();
        }
        inner.generation = inner.generation.wrapping_add(1);
        inner.profile = None;
    }
}
