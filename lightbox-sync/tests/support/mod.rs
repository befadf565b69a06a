//! Shared test harness: a scripted transport and a fully wired stack.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lightbox_core::{ApiConfig, ApiError};
use lightbox_fetch::{ApiClient, ApiRequest, Method, RawResponse, Transport};
use lightbox_store::{MemorySecretStore, SecretStore};
use lightbox_sync::{
    AvatarService, FeedSyncEngine, OAuthService, ProfileService, SessionCoordinator, WebSession,
};
use tokio::sync::oneshot;

// ============================================================================
// Scripted transport
// ============================================================================

struct ScriptedResponse {
    status: u16,
    body: Vec<u8>,
    gate: Option<oneshot::Receiver<()>>,
}

struct Route {
    method: Method,
    path_prefix: String,
    responses: VecDeque<ScriptedResponse>,
}

/// Transport that answers from a script instead of the network.
///
/// Responses are matched by method and path prefix and consumed in
/// order. A gated response does not resolve until the test releases it,
/// which is how "while the first request is still pending" scenarios are
/// staged deterministically.
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Scripts a response for the next matching request.
    pub fn respond(&self, method: Method, path_prefix: &str, status: u16, body: &str) {
        self.push(method, path_prefix, status, body.as_bytes().to_vec(), None);
    }

    /// Scripts a response held in flight until the returned sender fires
    /// (or is dropped).
    pub fn respond_gated(
        &self,
        method: Method,
        path_prefix: &str,
        status: u16,
        body: &str,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path_prefix, status, body.as_bytes().to_vec(), Some(rx));
        tx
    }

    fn push(
        &self,
        method: Method,
        path_prefix: &str,
        status: u16,
        body: Vec<u8>,
        gate: Option<oneshot::Receiver<()>>,
    ) {
        let mut routes = self.routes.lock().unwrap();
        let response = ScriptedResponse { status, body, gate };
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path_prefix == path_prefix)
        {
            route.responses.push_back(response);
        } else {
            routes.push(Route {
                method,
                path_prefix: path_prefix.to_string(),
                responses: VecDeque::from([response]),
            });
        }
    }

    /// Number of requests seen for a method/path-prefix pair.
    pub fn call_count(&self, method: Method, path_prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| *m == method && p.starts_with(path_prefix))
            .count()
    }

    /// All requests seen, as `(method, path)` pairs in arrival order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let response = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((request.method, request.path().to_string()));
            drop(calls);

            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|r| r.method == request.method && request.path().starts_with(&r.path_prefix))
                .and_then(|r| r.responses.pop_front())
        };

        let Some(response) = response else {
            return Err(ApiError::Transport(format!(
                "no scripted response for {} {}",
                request.method.as_str(),
                request.path()
            )));
        };

        if let Some(gate) = response.gate {
            // A dropped sender releases the gate too.
            let _ = gate.await;
        }

        Ok(RawResponse {
            status: response.status,
            body: response.body,
        })
    }
}

// ============================================================================
// Cookie-clearing recorder
// ============================================================================

/// Records how many times logout cleared the web session.
#[derive(Default)]
pub struct RecordingWebSession {
    cleared: AtomicUsize,
}

impl RecordingWebSession {
    pub fn cleared_count(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl WebSession for RecordingWebSession {
    fn clear_cookies(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Wired stack
// ============================================================================

/// A fully wired sync core over the scripted transport.
pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub secrets: Arc<MemorySecretStore>,
    pub web_session: Arc<RecordingWebSession>,
    pub oauth: Arc<OAuthService>,
    pub profile: Arc<ProfileService>,
    pub avatar: Arc<AvatarService>,
    pub feed: Arc<FeedSyncEngine>,
    pub coordinator: Arc<SessionCoordinator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_secrets(Arc::new(MemorySecretStore::new()))
    }

    pub fn with_token(token: &str) -> Self {
        Self::with_secrets(Arc::new(MemorySecretStore::with_token(token)))
    }

    fn with_secrets(secrets: Arc<MemorySecretStore>) -> Self {
        let transport = FakeTransport::new();
        let client = ApiClient::new(transport.clone());
        let config = Arc::new(ApiConfig {
            access_key: "test-access".to_string(),
            secret_key: "test-secret".to_string(),
            redirect_uri: "lightbox://auth".to_string(),
            ..Default::default()
        });
        let dyn_secrets: Arc<dyn SecretStore> = secrets.clone();
        let web_session = Arc::new(RecordingWebSession::default());

        let oauth = Arc::new(OAuthService::new(
            client.clone(),
            config.clone(),
            dyn_secrets.clone(),
        ));
        let profile = Arc::new(ProfileService::new(client.clone(), config.clone()));
        let avatar = Arc::new(AvatarService::new(
            client.clone(),
            config.clone(),
            dyn_secrets.clone(),
        ));
        let feed = Arc::new(FeedSyncEngine::new(client, config, dyn_secrets.clone()));
        let coordinator = Arc::new(SessionCoordinator::new(
            oauth.clone(),
            profile.clone(),
            avatar.clone(),
            feed.clone(),
            dyn_secrets,
            web_session.clone(),
        ));

        Self {
            transport,
            secrets,
            web_session,
            oauth,
            profile,
            avatar,
            feed,
            coordinator,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Yields until `cond` holds, or panics after a bounded number of polls.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached while driving the runtime");
}

/// Wire JSON for a single feed photo.
pub fn photo_json(id: &str, liked: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "width": 100,
        "height": 80,
        "created_at": "2026-01-05T08:00:00Z",
        "description": null,
        "alt_description": format!("photo {id}"),
        "liked_by_user": liked,
        "urls": {
            "thumb": format!("https://img.test/{id}/thumb"),
            "full": format!("https://img.test/{id}/full")
        }
    })
}

/// Wire JSON for a feed page of unliked photos with the given ids.
pub fn page_json(ids: &[&str]) -> String {
    let photos: Vec<_> = ids.iter().map(|id| photo_json(id, false)).collect();
    serde_json::Value::Array(photos).to_string()
}

/// Wire JSON for the `/me` profile response.
pub fn profile_json(username: &str, first: &str, last: Option<&str>) -> String {
    serde_json::json!({
        "username": username,
        "first_name": first,
        "last_name": last,
        "bio": null
    })
    .to_string()
}
