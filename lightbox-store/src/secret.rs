//! Secure bearer-token storage.
//!
//! The token lives in the system's secure credential storage:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! There is exactly one token slot, under a fixed service/account pair.
//! [`MemorySecretStore`] offers the same contract without touching the
//! platform keychain, for tests and headless environments.

use std::sync::Mutex;

use keyring::Entry;
use lightbox_core::models::AccessToken;
use tracing::debug;

use crate::error::StoreError;

/// Keychain service name for the Lightbox token.
const SERVICE: &str = "Lightbox";

/// Keychain account name for the Lightbox token.
const ACCOUNT: &str = "bearer_token";

// ============================================================================
// SecretStore trait
// ============================================================================

/// Opaque persistence for the single bearer token.
///
/// At most one valid token exists at a time. The OAuth service writes it
/// on a successful exchange; the session coordinator deletes it on logout
/// or when the profile fetch answers 401.
pub trait SecretStore: Send + Sync {
    /// Returns the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Keychain`] if secure storage is unavailable.
    fn get_token(&self) -> Result<Option<AccessToken>, StoreError>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Keychain`] if the write fails; the previous
    /// value is then still in place.
    fn set_token(&self, token: &str) -> Result<(), StoreError>;

    /// Deletes the stored token. Deleting an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Keychain`] if secure storage is unavailable.
    fn delete_token(&self) -> Result<(), StoreError>;
}

// ============================================================================
// Keychain-backed store
// ============================================================================

/// [`SecretStore`] backed by the platform keychain.
#[derive(Debug, Clone, Default)]
pub struct KeychainSecretStore;

impl KeychainSecretStore {
    /// Creates a keychain-backed store.
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, StoreError> {
        Entry::new(SERVICE, ACCOUNT)
            .map_err(|e| StoreError::Keychain(format!("failed to create entry: {e}")))
    }
}

impl SecretStore for KeychainSecretStore {
    fn get_token(&self) -> Result<Option<AccessToken>, StoreError> {
        match Self::entry()?.get_password() {
            // An empty value and a missing entry both mean "no token".
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keychain(e.to_string())),
        }
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        Self::entry()?
            .set_password(token)
            .map_err(|e| StoreError::Keychain(e.to_string()))?;
        debug!("Bearer token stored in keychain");
        Ok(())
    }

    fn delete_token(&self) -> Result<(), StoreError> {
        match Self::entry()?.delete_credential() {
            Ok(()) => {
                debug!("Bearer token deleted from keychain");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keychain(e.to_string())),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// [`SecretStore`] held in process memory.
///
/// Used by tests and by headless runs where the platform keychain is not
/// available. Contents do not survive the process.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    token: Mutex<Option<AccessToken>>,
}

impl MemorySecretStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SecretStore for MemorySecretStore {
    fn get_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.token.lock().expect("secret store lock poisoned").clone())
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().expect("secret store lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn delete_token(&self) -> Result<(), StoreError> {
        *self.token.lock().expect("secret store lock poisoned") = None;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySecretStore::new();
        assert_eq!(store.get_token().unwrap(), None);

        store.set_token("abc").unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("abc"));

        store.set_token("def").unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("def"));

        store.delete_token().unwrap();
        assert_eq!(store.get_token().unwrap(), None);
    }

    #[test]
    fn memory_store_delete_is_idempotent() {
        let store = MemorySecretStore::with_token("abc");
        store.delete_token().unwrap();
        store.delete_token().unwrap();
        assert_eq!(store.get_token().unwrap(), None);
    }

    // Keychain operations require platform access and are exercised as
    // manual integration tests; the unit tests cover the shared contract
    // through the in-memory implementation.
}
