//! JSON-persisted settings.

use std::path::{Path, PathBuf};

use lightbox_core::ApiConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Directory under the platform config dir.
const APP_DIR: &str = "lightbox";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Settings
// ============================================================================

/// Persisted user configuration.
///
/// Unknown fields are ignored and missing fields fall back to defaults,
/// so the file survives version skew in both directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API endpoints and client credentials.
    pub api: ApiConfig,
}

impl Settings {
    /// Returns the API configuration with environment overrides applied.
    pub fn resolved_api(&self) -> ApiConfig {
        self.api.clone().with_env_overrides()
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Returns the default settings path under the platform config directory.
///
/// # Errors
///
/// Returns [`StoreError::NoConfigDir`] when the platform exposes no
/// config directory.
pub fn default_settings_path() -> Result<PathBuf, StoreError> {
    let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
    Ok(dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Loads settings, falling back to defaults when the file is absent.
///
/// A missing file is the normal first-run state, not an error. A present
/// but unreadable file is.
///
/// # Errors
///
/// Returns [`StoreError::Io`] or [`StoreError::Serialization`] when the
/// file exists but cannot be read or parsed.
pub async fn load_or_default(path: &Path) -> Result<Settings, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let settings = serde_json::from_slice(&bytes)?;
            debug!(path = %path.display(), "Loaded settings");
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No settings file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read settings");
            Err(e.into())
        }
    }
}

/// Saves settings, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`StoreError::Io`] or [`StoreError::Serialization`] when the
/// write fails.
pub async fn save(path: &Path, settings: &Settings) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(settings)?;
    tokio::fs::write(path, json).await?;
    debug!(path = %path.display(), "Saved settings");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
