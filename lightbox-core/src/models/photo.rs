//! Feed photo model and mapping.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// Domain model
// ============================================================================

/// A single item in the photo feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Stable server-assigned identifier.
    pub id: String,
    /// Pixel width of the full image.
    pub width: u32,
    /// Pixel height of the full image.
    pub height: u32,
    /// Upload timestamp, when the server provided a parseable one.
    pub created_at: Option<DateTime<Utc>>,
    /// Caption, if any.
    pub description: Option<String>,
    /// URL of the thumbnail rendition.
    pub thumb_url: String,
    /// URL of the full-size rendition.
    pub full_url: String,
    /// Whether the authenticated user has liked this photo.
    pub liked: bool,
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// Wire shape of a feed photo.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoDto {
    /// Server-assigned identifier.
    pub id: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Upload timestamp as an RFC 3339 string.
    pub created_at: Option<String>,
    /// Caption.
    pub description: Option<String>,
    /// Alternative caption, used when `description` is null.
    pub alt_description: Option<String>,
    /// Whether the authenticated user has liked this photo.
    pub liked_by_user: bool,
    /// Image rendition URLs.
    pub urls: PhotoUrlsDto,
}

/// Wire shape of a photo's rendition URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrlsDto {
    /// Thumbnail rendition.
    pub thumb: String,
    /// Full-size rendition.
    pub full: String,
}

// ============================================================================
// Mapping
// ============================================================================

impl From<PhotoDto> for Photo {
    fn from(dto: PhotoDto) -> Self {
        // An unparseable timestamp degrades to None rather than failing
        // the whole page.
        let created_at = dto
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let description = dto.description.or(dto.alt_description);

        Self {
            id: dto.id,
            width: dto.width,
            height: dto.height,
            created_at,
            description,
            thumb_url: dto.urls.thumb,
            full_url: dto.urls.full,
            liked: dto.liked_by_user,
        }
    }
}

impl Photo {
    /// Returns a copy of this photo with the `liked` flag inverted.
    pub fn with_toggled_like(&self) -> Self {
        Self {
            liked: !self.liked,
            ..self.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
