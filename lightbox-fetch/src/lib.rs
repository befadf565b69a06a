// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lightbox Fetch
//!
//! HTTP transport and API client for Lightbox.
//!
//! This crate provides:
//!
//! - [`ApiRequest`] / [`Method`] - A transport-agnostic request model
//! - [`Transport`] - The seam between the client and the network; tests
//!   substitute a scripted implementation here
//! - [`HttpTransport`] - The reqwest-backed production transport
//! - [`ApiClient`] - Outcome classification (status window, empty body,
//!   JSON decoding) shared by every service
//!
//! The client performs no retries; a failed fetch surfaces to the caller.

pub mod client;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use request::{api_url, ApiRequest, Method};
pub use transport::{HttpTransport, RawResponse, Transport};
