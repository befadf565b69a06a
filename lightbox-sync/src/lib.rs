// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lightbox Sync
//!
//! The client-side data synchronization core: token lifecycle, profile
//! and avatar fetching, the paginated feed cache, and the session
//! coordinator that sequences them.
//!
//! ## Concurrency model
//!
//! Every service follows the same discipline:
//!
//! - I/O runs in a spawned task holding no locks.
//! - The awaited completion re-locks the service's state and applies its
//!   result only if the slot's generation still matches the one it was
//!   spawned under. Superseded, reset, or aborted work can therefore
//!   never mutate state late, no matter when its completion lands.
//! - Change notification is a `tokio::sync::watch` channel per service;
//!   subscribers re-read a snapshot when it fires.
//!
//! ## Key Types
//!
//! - [`OAuthService`] - Exchanges an authorization code for a bearer
//!   token exactly once per code
//! - [`ProfileService`] / [`AvatarService`] - Single-flight fetchers with
//!   cancel-then-replace semantics
//! - [`FeedSyncEngine`] - Ordered paginated feed with confirm-then-apply
//!   like toggling
//! - [`SessionCoordinator`] - Login, session restore, and logout
//!   sequencing
//! - [`BusyGuard`] - Reference-counted blocking-indicator flag

pub mod auth;
pub mod avatar;
pub mod busy;
pub mod feed;
pub mod profile;
pub mod session;
pub mod web_session;

pub use auth::{authorize_url, extract_code, OAuthService};
pub use avatar::AvatarService;
pub use busy::BusyGuard;
pub use feed::FeedSyncEngine;
pub use profile::ProfileService;
pub use session::{SessionCoordinator, SessionState};
pub use web_session::{NoWebSession, WebSession};
