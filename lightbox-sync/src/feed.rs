//! The paginated feed cache and its mutations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use lightbox_core::models::{Photo, PhotoDto};
use lightbox_core::{ApiConfig, ApiError};
use lightbox_fetch::{api_url, ApiClient, ApiRequest};
use lightbox_store::SecretStore;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Inner {
    photos: Vec<Photo>,
    last_loaded_page: Option<u32>,
    generation: u64,
    inflight: Option<AbortHandle>,
    pending_likes: HashSet<String>,
}

/// Maintains the ordered, paginated collection of feed photos.
///
/// Pages are appended in server order, concatenated across fetches. The
/// engine performs no de-duplication: if the server repeats an id across
/// pages the duplicate is kept as-is, a known latent risk for consumers
/// that key rows by id.
///
/// Subscribers observe the item count on a watch channel; within a
/// session it is monotonically non-decreasing except across an explicit
/// [`FeedSyncEngine::reset`].
pub struct FeedSyncEngine {
    client: ApiClient,
    config: Arc<ApiConfig>,
    secrets: Arc<dyn SecretStore>,
    inner: Mutex<Inner>,
    notify: watch::Sender<usize>,
}

impl FeedSyncEngine {
    /// Creates the engine with an empty collection.
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
        self.inner.lock().expect("feed state lock poisoned")
    }

    /// Returns a snapshot of the current collection, in page order.
    pub fn photos(&self) -> Vec<Photo> {
        self.lock().photos.clone()
    }

    /// Returns the number of the last successfully loaded page.
    pub fn last_loaded_page(&self) -> Option<u32> {
        self.lock().last_loaded_page
    }

    /// Returns true while a page fetch is in flight.
    pub fn is_pending(&self) -> bool {
        self.lock().inflight.is_some()
    }

    /// Returns true while a like mutation for `photo_id` is outstanding.
    ///
    /// The engine does not reject a second toggle for the same photo (the
    /// endpoint is idempotent per direction); this flag exists so a UI
    /// collaborator can disable the triggering control until completion.
    pub fn is_like_pending(&self, photo_id: &str) -> bool {
        self.lock().pending_likes.contains(photo_id)
    }

    /// Subscribes to change notifications carrying the new item count.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.notify.subscribe()
    }

    /// Fetches the next feed page and appends it to the collection.
    ///
    /// A no-op while a page fetch is already pending, so rapid repeated
    /// triggers collapse into one network call. The first call loads
    /// page 1. On failure nothing changes and no notification fires; the
    /// caller may simply call again to retry.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] when a reset superseded the fetch, plus
    /// the usual transport/status/decoding failures.
    pub async fn fetch_next_page(&self) -> Result<(), ApiError> {
        let (generation, page, task) = {
            let mut inner = self.lock();
            if inner.inflight.is_some() {
                debug!("Page fetch already pending, ignoring trigger");
                return Ok(());
            }
            let page = inner.last_loaded_page.unwrap_or(0) + 1;
            let request = self.photos_request(page)?;
            let client = self.client.clone();
            let task =
                tokio::spawn(async move { client.fetch_json::<Vec<PhotoDto>>(request).await });
            inner.inflight = Some(task.abort_handle());
            (inner.generation, page, task)
        };

        debug!(page, "Fetching feed page");

        let result = match task.await {
            Ok(result) => result,
            Err(_) => return Err(ApiError::Cancelled),
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            // Reset while in flight; the fetched page belongs to a dead
            // session and must not land.
            return Err(ApiError::Cancelled);
        }
        inner.inflight = None;

        match result {
            Ok(dtos) => {
                inner.photos.extend(dtos.into_iter().map(Photo::from));
                inner.last_loaded_page = Some(page);
                let count = inner.photos.len();
                drop(inner);
                debug!(page, count, "Feed page appended");
                self.notify.send_replace(count);
                Ok(())
            }
            Err(e) => {
                warn!(page, error = %e, "Feed page fetch failed");
                Err(e)
            }
        }
    }

    /// Toggles the like state of `photo_id`, confirm-then-apply.
    ///
    /// The direction is derived from the photo's current `liked` flag.
    /// Nothing is flipped speculatively: only after the server answers
    /// 2xx does the engine replace the photo in place, at the same index,
    /// and notify. On failure the collection is untouched and the error
    /// surfaces to the caller; there is nothing to roll back.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] when no photo with `photo_id` is in
    /// the collection, plus the usual transport/status failures.
    pub async fn toggle_like(&self, photo_id: &str) -> Result<(), ApiError> {
        let request = {
            let mut inner = self.lock();
            let photo = inner
                .photos
                .iter()
                .find(|p| p.id == photo_id)
                .ok_or_else(|| {
                    ApiError::InvalidRequest(format!("unknown photo id {photo_id}"))
                })?;
            let request = self.like_request(photo_id, !photo.liked)?;
            inner.pending_likes.insert(photo_id.to_string());
            request
        };

        // Not tracked by the idle guard and not cancelled by reset: a
        // completion landing after reset finds no matching photo below
        // and mutates nothing.
        let result = self.client.execute(request).await;

        let mut inner = self.lock();
        inner.pending_likes.remove(photo_id);

        match result {
            Ok(_) => {
                if let Some(index) = inner.photos.iter().position(|p| p.id == photo_id) {
                    let toggled = inner.photos[index].with_toggled_like();
                    inner.photos[index] = toggled;
                    let count = inner.photos.len();
                    drop(inner);
                    debug!(photo_id, "Like toggled");
                    self.notify.send_replace(count);
                }
                Ok(())
            }
            Err(e) => {
                warn!(photo_id, error = %e, "Like toggle failed");
                Err(e)
            }
        }
    }

    /// Cancels any in-flight page fetch and clears the collection.
    ///
    /// The logout path: `last_loaded_page` is cleared too, and no
    /// notification is emitted.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if let Some(handle) = inner.inflight.take() {
            handle.abort();
        }
        inner.generation = inner.generation.wrapping_add(1);
        inner.photos.clear();
        inner.last_loaded_page = None;
    }

    fn photos_request(&self, page: u32) -> Result<ApiRequest, ApiError> {
        let mut url = api_url(&self.config.base_url, "/photos")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.config.per_page.to_string())
            .append_pair("order_by", &self.config.order_by);
        Ok(self.with_bearer(ApiRequest::get(url)))
    }

    fn like_request(&self, photo_id: &str, set_like: bool) -> Result<ApiRequest, ApiError> {
        let mut url = api_url(&self.config.base_url, "/photos/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(photo_id)
            .push("like");

        let request = if set_like {
            ApiRequest::post(url)
        } else {
            ApiRequest::delete(url)
        };
        Ok(self.with_bearer(request))
    }

    fn with_bearer(&self, request: ApiRequest) -> ApiRequest {
        match self.secrets.get_token() {
            Ok(Some(token)) => request.bearer(token),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "Secret store unavailable, sending unauthenticated");
                request
            }
        }
    }
}
