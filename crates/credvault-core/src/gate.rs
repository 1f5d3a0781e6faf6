//! Binding of an authenticated principal to every credential operation.
//!
//! The owner of a record is never taken from caller input. A [`Session`] is
//! only obtainable through [`AccessGate::authorize`], which asks the
//! [`Authenticator`] collaborator who is calling, and every operation on the
//! session threads that principal down into the [`CredentialStore`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::credentials::{Credential, CredentialStore, CredentialUpdate, NewCredential};
use crate::error::{Result, VaultError};
use crate::storage::{
    CredentialSummary, Principal, PrincipalId, PrincipalProfile, RecordId, VaultStorage,
};

/// Supplies the principal established by an external login mechanism.
pub trait Authenticator {
    /// # Errors
    ///
    /// Returns `VaultError::Unauthenticated` when no verified principal exists.
    fn authenticated_principal(&self) -> Result<PrincipalId>;
}

/// Entry point of the core: owns the store and hands out sessions.
pub struct AccessGate<S> {
    storage: Arc<S>,
    store: CredentialStore<S>,
}

impl<S: VaultStorage> AccessGate<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            store: CredentialStore::new(Arc::clone(&storage)),
            storage,
        }
    }

    /// Register the authenticated principal by generating its key.
    ///
    /// # Errors
    ///
    /// - `VaultError::Unauthenticated` if the authenticator yields no principal
    /// - `VaultError::Conflict` if the principal is already registered
    pub fn register(&self, authenticator: &dyn Authenticator) -> Result<Principal> {
        let principal = authenticator
            .authenticated_principal()
            .map_err(|_| VaultError::Unauthenticated)?;

        self.store.keys().generate_key(&principal)?;
        info!(principal = %principal, "registered principal");

        self.storage
            .get_principal(&principal)?
            .ok_or_else(|| VaultError::NotFound(format!("principal {}", principal)))
    }

    /// Open a session for the authenticated principal.
    ///
    /// # Errors
    ///
    /// - `VaultError::Unauthenticated` if the authenticator yields no principal
    /// - `VaultError::Unauthorized` if the principal was never registered
    pub fn authorize(&self, authenticator: &dyn Authenticator) -> Result<Session<'_, S>> {
        let principal = match authenticator.authenticated_principal() {
            Ok(principal) => principal,
            Err(err) => {
                debug!(reason = %err, "authentication failed");
                return Err(VaultError::Unauthenticated);
            }
        };

        if !self.store.keys().has_key(&principal)? {
            warn!(principal = %principal, "unregistered principal denied");
            return Err(VaultError::Unauthorized);
        }

        Ok(Session {
            gate: self,
            principal,
        })
    }

    /// Run the backend's consistency checks.
    pub fn check_integrity(&self) -> Result<()> {
        self.storage.check_integrity()
    }
}

/// Operations on behalf of one authenticated principal.
pub struct Session<'a, S> {
    gate: &'a AccessGate<S>,
    principal: PrincipalId,
}

impl<S> std::fmt::Debug for Session<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

impl<'a, S: VaultStorage> Session<'a, S> {
    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    /// Check an owner named by the caller against the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Unauthorized` if they differ.
    pub fn scoped(&self, claimed_owner: &PrincipalId) -> Result<&Self> {
        if claimed_owner != &self.principal {
            warn!(
                principal = %self.principal,
                claimed = %claimed_owner,
                "rejected access to another principal's partition"
            );
            return Err(VaultError::Unauthorized);
        }
        Ok(self)
    }

    pub fn add_credential(&self, credential: NewCredential) -> Result<RecordId> {
        self.gate.store.add_credential(&self.principal, credential)
    }

    pub fn get_credential(&self, id: RecordId) -> Result<Credential> {
        self.gate.store.get_credential(&self.principal, id)
    }

    pub fn update_credential(&self, id: RecordId, update: CredentialUpdate) -> Result<()> {
        self.gate.store.update_credential(&self.principal, id, update)
    }

    pub fn delete_credential(&self, id: RecordId) -> Result<()> {
        self.gate.store.delete_credential(&self.principal, id)
    }

    pub fn list_credentials(&self) -> Result<Vec<CredentialSummary>> {
        self.gate.store.list_credentials(&self.principal)
    }

    /// Registration details and record count of the session's principal.
    pub fn profile(&self) -> Result<PrincipalProfile> {
        let principal = self
            .gate
            .storage
            .get_principal(&self.principal)?
            .ok_or_else(|| VaultError::NotFound(format!("principal {}", self.principal)))?;
        let credential_count = self.gate.store.count_credentials(&self.principal)?;

        Ok(PrincipalProfile {
            id: principal.id,
            created_at: principal.created_at,
            credential_count,
        })
    }

    /// Remove the principal, its key and every record it owns.
    pub fn unregister(self) -> Result<()> {
        self.gate.storage.delete_principal(&self.principal)?;
        info!(principal = %self.principal, "unregistered principal");
        Ok(())
    }
}
