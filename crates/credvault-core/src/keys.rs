//! Per-principal key lifecycle.
//!
//! Generating a key is what registers a principal: the principal row and its
//! key are inserted together, so no record can ever exist for a principal
//! without key material. Keys are never rotated or replaced.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::crypto::KeyMaterial;
use crate::error::{Result, VaultError};
use crate::storage::{NewPrincipal, PrincipalId, VaultStorage};

/// Generates and retrieves the key material of each principal.
pub struct KeyManager<S> {
    storage: Arc<S>,
}

impl<S> Clone for KeyManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: VaultStorage> KeyManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Generate key material for `principal` and persist it.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Conflict` if the principal already has a key. The
    /// existing key stays in place, so previously encrypted records remain
    /// decryptable.
    pub fn generate_key(&self, principal: &PrincipalId) -> Result<KeyMaterial> {
        let key = KeyMaterial::generate()?;
        let new_principal = NewPrincipal {
            id: principal.clone(),
            key: key.clone(),
            created_at: Utc::now(),
        };

        match self.storage.insert_principal(&new_principal) {
            Ok(()) => {
                debug!(principal = %principal, "generated key material");
                Ok(key)
            }
            Err(err @ VaultError::Conflict(_)) => {
                warn!(principal = %principal, "rejected second key generation");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Get the key material of `principal`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the principal was never registered.
    pub fn get_key(&self, principal: &PrincipalId) -> Result<KeyMaterial> {
        self.storage
            .get_key(principal)?
            .ok_or_else(|| VaultError::NotFound(format!("key for principal {}", principal)))
    }

    /// True if `principal` has key material.
    pub fn has_key(&self, principal: &PrincipalId) -> Result<bool> {
        Ok(self.storage.get_principal(principal)?.is_some())
    }
}
