// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lightbox Store
//!
//! Secret and settings storage for Lightbox.
//!
//! This crate provides:
//!
//! - **[`SecretStore`]**: Opaque get/set/delete for the single bearer
//!   token, with a system-keychain implementation and an in-memory one
//!   for tests and headless use
//! - **[`Settings`]**: JSON-persisted configuration under the platform
//!   config directory
//!
//! The bearer token never leaves this crate except through
//! [`SecretStore`]; the sync layer writes it on a successful exchange and
//! the session coordinator clears it on logout or a 401.

pub mod error;
pub mod secret;
pub mod settings;

pub use error::StoreError;
pub use secret::{KeychainSecretStore, MemorySecretStore, SecretStore};
pub use settings::{default_settings_path, load_or_default, save, Settings};
