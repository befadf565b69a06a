//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Secure storage operation failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No usable settings location on this platform.
    #[error("No configuration directory available")]
    NoConfigDir,
}
