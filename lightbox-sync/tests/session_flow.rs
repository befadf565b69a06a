//! End-to-end session sequencing: restore, login, forced logout, teardown.

mod support;

use lightbox_core::ApiError;
use lightbox_fetch::Method;
use lightbox_store::SecretStore;
use lightbox_sync::SessionState;
use support::{page_json, profile_json, wait_until, Harness};

#[tokio::test]
async fn restore_without_a_token_never_touches_the_network() {
    let h = Harness::new();

    let restored = h.coordinator.restore_session().await.unwrap();

    assert!(restored.is_none());
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn restore_with_a_rejected_token_forces_logout() {
    let h = Harness::with_token("stale");
    h.transport
        .respond(Method::Get, "/me", 401, r#"{"errors":["unauthorized"]}"#);

    let err = h.coordinator.restore_session().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.secrets.get_token().unwrap(), None);
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn restore_with_a_valid_token_promotes_the_session() {
    let h = Harness::with_token("tok");
    h.transport
        .respond(Method::Get, "/me", 200, &profile_json("alice", "A", Some("B")));
    h.transport.respond(
        Method::Get,
        "/users/alice",
        200,
        r#"{"profile_image":{"small":"https://img.test/alice.png"}}"#,
    );
    h.transport
        .respond(Method::Get, "/photos", 200, &page_json(&["p1"]));

    let profile = h.coordinator.restore_session().await.unwrap().unwrap();

    assert_eq!(profile.username, "alice");
    assert_eq!(profile.name, "A B");
    assert_eq!(profile.login_name, "@alice");
    assert_eq!(profile.bio, None);
    assert_eq!(h.coordinator.state(), SessionState::Authenticated);
    assert_eq!(h.profile.profile().unwrap(), profile);

    // Avatar and first feed page follow without blocking the promote.
    wait_until(|| h.avatar.avatar_url().is_some() && !h.feed.photos().is_empty()).await;
    assert_eq!(
        h.avatar.avatar_url().as_deref(),
        Some("https://img.test/alice.png")
    );
    assert_eq!(h.feed.last_loaded_page(), Some(1));
}

#[tokio::test]
async fn transient_profile_failure_keeps_the_token() {
    let h = Harness::with_token("tok");
    h.transport.respond(Method::Get, "/me", 500, "oops");

    let err = h.coordinator.restore_session().await.unwrap_err();

    assert!(matches!(err, ApiError::HttpStatus(500)));
    // Not a forced logout: the token survives for the next attempt.
    assert_eq!(h.secrets.get_token().unwrap().as_deref(), Some("tok"));
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn login_runs_exchange_then_profile_then_promote() {
    let h = Harness::new();
    h.transport.respond(
        Method::Post,
        "/oauth/token",
        200,
        r#"{"access_token":"fresh"}"#,
    );
    h.transport
        .respond(Method::Get, "/me", 200, &profile_json("bob", "Bob", None));

    let profile = h.coordinator.login("the-code").await.unwrap();

    assert_eq!(profile.name, "Bob");
    assert_eq!(h.secrets.get_token().unwrap().as_deref(), Some("fresh"));
    assert_eq!(h.coordinator.state(), SessionState::Authenticated);

    let paths: Vec<String> = h.transport.calls().into_iter().map(|(_, p)| p).collect();
    assert_eq!(paths[0], "/oauth/token");
    assert_eq!(paths[1], "/me");
}

#[tokio::test]
async fn failed_exchange_returns_to_unauthenticated() {
    let h = Harness::new();
    h.transport
        .respond(Method::Post, "/oauth/token", 400, "denied");

    let err = h.coordinator.login("bad-code").await.unwrap_err();

    assert!(matches!(err, ApiError::HttpStatus(400)));
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
    assert_eq!(h.secrets.get_token().unwrap(), None);
}

#[tokio::test]
async fn logout_tears_down_every_service_and_clears_cookies() {
    let h = Harness::with_token("tok");
    h.transport
        .respond(Method::Get, "/me", 200, &profile_json("alice", "A", Some("B")));
    h.transport
        .respond(Method::Get, "/photos", 200, &page_json(&["p1", "p2"]));
    h.coordinator.restore_session().await.unwrap();
    wait_until(|| !h.feed.photos().is_empty()).await;

    h.coordinator.logout();

    assert_eq!(h.secrets.get_token().unwrap(), None);
    assert_eq!(h.profile.profile(), None);
    assert_eq!(h.avatar.avatar_url(), None);
    assert!(h.feed.photos().is_empty());
    assert_eq!(h.feed.last_loaded_page(), None);
    assert_eq!(h.web_session.cleared_count(), 1);
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn logout_during_a_pending_restore_discards_the_late_profile() {
    let h = Harness::with_token("tok");
    let gate = h.transport.respond_gated(
        Method::Get,
        "/me",
        200,
        &profile_json("alice", "A", Some("B")),
    );

    let coordinator = h.coordinator.clone();
    let restore = tokio::spawn(async move { coordinator.restore_session().await });
    wait_until(|| h.transport.call_count(Method::Get, "/me") == 1).await;

    // Logout lands while the profile response is still in flight.
    h.coordinator.logout();

    let _ = gate.send(());
    let result = restore.await.unwrap();
    assert!(matches!(result, Err(ApiError::Cancelled)));

    // The late profile never materialized anywhere.
    assert_eq!(h.profile.profile(), None);
    assert_eq!(h.secrets.get_token().unwrap(), None);
    assert_eq!(h.coordinator.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn avatar_reset_ignores_a_late_completion() {
    let h = Harness::with_token("tok");
    let gate = h.transport.respond_gated(
        Method::Get,
        "/users/alice",
        200,
        r#"{"profile_image":{"small":"https://img.test/late.png"}}"#,
    );

    let avatar = h.avatar.clone();
    let pending = tokio::spawn(async move { avatar.fetch("alice").await });
    wait_until(|| h.transport.call_count(Method::Get, "/users/alice") == 1).await;

    let mut changes = h.avatar.subscribe();
    h.avatar.reset();

    let _ = gate.send(());
    let result = pending.await.unwrap();
    assert!(matches!(result, Err(ApiError::Cancelled)));

    assert_eq!(h.avatar.avatar_url(), None);
    assert!(!changes.has_changed().unwrap());
}

#[tokio::test]
async fn a_newer_avatar_fetch_supersedes_the_older_one() {
    let h = Harness::with_token("tok");
    let gate = h.transport.respond_gated(
        Method::Get,
        "/users/old",
        200,
        r#"{"profile_image":{"small":"https://img.test/old.png"}}"#,
    );
    h.transport.respond(
        Method::Get,
        "/users/new",
        200,
        r#"{"profile_image":{"small":"https://img.test/new.png"}}"#,
    );

    let avatar = h.avatar.clone();
    let first = tokio::spawn(async move { avatar.fetch("old").await });
    wait_until(|| h.transport.call_count(Method::Get, "/users/old") == 1).await;

    let url = h.avatar.fetch("new").await.unwrap();
    assert_eq!(url, "https://img.test/new.png");

    let _ = gate.send(());
    let first_result = first.await.unwrap();
    assert!(matches!(first_result, Err(ApiError::Cancelled)));

    // The superseded fetch must not clobber the newer value.
    assert_eq!(h.avatar.avatar_url().as_deref(), Some("https://img.test/new.png"));
}
