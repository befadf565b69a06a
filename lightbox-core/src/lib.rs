// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lightbox Core
//!
//! Core types, models, and errors for the Lightbox photo-feed client.
//!
//! This crate provides the foundational abstractions used across all other
//! Lightbox crates, including:
//!
//! - Domain models (profile, avatar, photos) and their wire DTOs
//! - The API error taxonomy
//! - Endpoint configuration
//!
//! ## Key Types
//!
//! - [`Profile`] - The authenticated user's profile
//! - [`Photo`] - A single feed item
//! - [`ApiError`] - Error taxonomy shared by the fetch and sync layers
//! - [`ApiConfig`] - Endpoints, client credentials, and paging defaults

pub mod config;
pub mod error;
pub mod models;

// Re-export error types
pub use error::ApiError;

// Re-export configuration
pub use config::ApiConfig;

// Re-export all model types
pub use models::{
    AccessToken,
    Photo,
    PhotoDto,
    PhotoUrlsDto,
    Profile,
    ProfileDto,
    ProfileImageDto,
    TokenResponseDto,
    UserDto,
};
