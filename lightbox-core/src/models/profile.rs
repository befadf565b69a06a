//! Profile and avatar models and mapping.

use serde::Deserialize;

// ============================================================================
// Domain model
// ============================================================================

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Account username.
    pub username: String,
    /// Display name assembled from first and last name.
    pub name: String,
    /// Login handle, `@username`.
    pub login_name: String,
    /// Free-form biography, if set.
    pub bio: Option<String>,
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// Wire shape of the `/me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDto {
    /// Account username.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name; absent for single-name accounts.
    pub last_name: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
}

/// Wire shape of the `/users/{username}` response, reduced to what the
/// avatar service needs.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    /// Avatar renditions.
    pub profile_image: ProfileImageDto,
}

/// Wire shape of a user's avatar renditions.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImageDto {
    /// Small avatar rendition URL.
    pub small: String,
}

// ============================================================================
// Mapping
// ============================================================================

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        // A missing or empty last name must not leave a trailing space.
        let name = match dto.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", dto.first_name),
            _ => dto.first_name.clone(),
        };

        Self {
            login_name: format!("@{}", dto.username),
            username: dto.username,
            name,
            bio: dto.bio,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_name_and_login_handle() {
        let profile = Profile::from(ProfileDto {
            username: "alice".to_string(),
            first_name: "A".to_string(),
            last_name: Some("B".to_string()),
            bio: None,
        });
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.name, "A B");
        assert_eq!(profile.login_name, "@alice");
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn missing_last_name_uses_first_name_only() {
        let profile = Profile::from(ProfileDto {
            username: "bob".to_string(),
            first_name: "Bob".to_string(),
            last_name: None,
            bio: Some("hi".to_string()),
        });
        assert_eq!(profile.name, "Bob");
        assert_eq!(profile.bio.as_deref(), Some("hi"));
    }

    #[test]
    fn empty_last_name_uses_first_name_only() {
        let profile = Profile::from(ProfileDto {
            username: "carol".to_string(),
            first_name: "Carol".to_string(),
            last_name: Some(String::new()),
            bio: None,
        });
        assert_eq!(profile.name, "Carol");
    }

    #[test]
    fn deserializes_wire_payload() {
        let json = r#"{"username":"alice","first_name":"A","last_name":"B","bio":null}"#;
        let dto: ProfileDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.username, "alice");
        assert_eq!(dto.last_name.as_deref(), Some("B"));
    }

    #[test]
    fn deserializes_user_avatar_payload() {
        let json = r#"{"profile_image":{"small":"https://img.example/s.png"}}"#;
        let dto: UserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.profile_image.small, "https://img.example/s.png");
    }
}
