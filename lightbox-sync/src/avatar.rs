//! Avatar URL fetching for a username.

use std::sync::{Arc, Mutex, MutexGuard};

use lightbox_core::models::UserDto;
use lightbox_core::{ApiConfig, ApiError};
use lightbox_fetch::{api_url, ApiClient, ApiRequest};
use lightbox_store::SecretStore;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Inner {
    avatar_url: Option<String>,
    generation: u64,
    inflight: Option<AbortHandle>,
}

/// Fetches and caches the avatar URL for a username.
///
/// Same single-flight discipline as the profile service: the latest
/// `fetch` wins unconditionally, success replaces the value and notifies,
/// failure leaves the previous value and stays silent.
pub struct AvatarService {
    client: ApiClient,
    config: Arc<ApiConfig>,
    secrets: Arc<dyn SecretStore>,
    inner: Mutex<Inner>,
    notify: watch::Sender<u64>,
}

impl AvatarService {
    /// Creates the service.
    pub fn new(client: ApiClient, config: Arc<ApiConfig>, secrets: Arc<dyn SecretStore>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            client,
            config,
            secrets,
            inner: Mutex::new(Inner::default()),
            notify,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("avatar state lock poisoned")
    }

    /// Returns the current avatar URL snapshot.
    pub fn avatar_url(&self) -> Option<String> {
        self.lock().avatar_url.clone()
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Fetches the avatar URL for `username`, superseding any in-flight
    /// fetch.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] when superseded or reset, plus the usual
    /// transport/status/decoding failures.
    pub async fn fetch(&self, username: &str) -> Result<String, ApiError> {
        let (generation, task) = {
            let mut inner = self.lock();
            if let Some(handle) = inner.inflight.take() {
                handle.abort();
            }
            inner.generation = inner.generation.wrapping_add(1);
            let request = self.user_request(username)?;
            let client = self.client.clone();
            let task = tokio::spawn(async move { client.fetch_json::<UserDto>(request).await });
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
            Ok(user) => {
                let url = user.profile_image.small;
                inner.avatar_url = Some(url.clone());
                drop(inner);
                debug!(username, "Avatar URL updated");
                self.notify.send_modify(|version| *version += 1);
                Ok(url)
            }
            Err(e) => {
                warn!(username, error = %e, "Avatar fetch failed");
                Err(e)
            }
        }
    }

    /// Cancels any in-flight fetch and clears the stored URL, silently.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if let Some(handle) = inner.inflight.take() {
            handle.abort();
        }
        inner.generation = inner.generation.wrapping_add(1);
        inner.avatar_url = None;
    }

    fn user_request(&self, username: &str) -> Result<ApiRequest, ApiError> {
        let mut url = api_url(&self.config.base_url, "/users/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(username);

        let token = self.secrets.get_token().unwrap_or_else(|e| {
            warn!(error = %e, "Secret store unavailable, sending unauthenticated");
            None
        });

        let mut request = ApiRequest::get(url);
        if let Some(token) = token {
            request = request.bearer(token);
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use lightbox_store::MemorySecretStore;

    use super::*;

    #[test]
    fn user_request_escapes_the_username() {
        let service = AvatarService::new(
            ApiClient::http().unwrap(),
            Arc::new(ApiConfig::default()),
            Arc::new(MemorySecretStore::with_token("tok")),
        );
        let request = service.user_request("odd name/x").unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.unsplash.com/users/odd%20name%2Fx"
        );
        assert_eq!(request.bearer.as_deref(), Some("tok"));
    }
}
