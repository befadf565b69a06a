//! Domain models and their wire DTOs.
//!
//! Each model comes in two shapes: the wire DTO exactly as the API returns
//! it (serde renames, nullable fields) and the domain struct the rest of
//! the application works with. Mapping happens once, at the fetch boundary.

pub mod photo;
pub mod profile;

pub use photo::{Photo, PhotoDto, PhotoUrlsDto};
pub use profile::{Profile, ProfileDto, ProfileImageDto, UserDto};

use serde::Deserialize;

/// A bearer token, opaque to everything but the `Authorization` header.
pub type AccessToken = String;

/// Wire shape of the token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponseDto {
    /// The bearer token granted for the exchanged code.
    pub access_token: String,
}
