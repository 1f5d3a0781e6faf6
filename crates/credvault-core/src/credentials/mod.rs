//! Credential store with a plaintext boundary.
//!
//! Callers hand in and get back plaintext secrets; encryption under the
//! owner's key happens inside. Every operation takes the owning principal
//! explicitly and only ever touches that principal's records. A record that
//! exists but belongs to someone else is reported exactly like a missing one.

mod locks;
pub mod validation;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::crypto::{self, CipherToken};
use crate::error::{Result, VaultError};
use crate::keys::KeyManager;
use crate::storage::{
    CredentialMetadata, CredentialSummary, NewRecord, PrincipalId, RecordId, RecordUpdate,
    VaultStorage,
};

use locks::RecordLocks;
use validation::{
    normalize_metadata, normalize_notes, normalize_site, normalize_url, normalize_username,
    validate_secret,
};

/// A credential to add.
#[derive(Debug)]
pub struct NewCredential {
    /// Site name (not unique per owner)
    pub site: String,

    /// Plaintext secret
    pub secret: SecretString,

    /// Optional descriptive fields
    pub metadata: CredentialMetadata,
}

impl NewCredential {
    pub fn new(site: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            secret: SecretString::from(secret.into()),
            metadata: CredentialMetadata::default(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.metadata.username = Some(username.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.metadata.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.metadata.notes = Some(notes.into());
        self
    }
}

/// A decrypted credential.
#[derive(Debug)]
pub struct Credential {
    pub id: RecordId,
    pub site: String,
    pub secret: SecretString,
    pub metadata: CredentialMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial change to a credential.
///
/// Fields left as `None` are kept. An empty string for `username`, `url` or
/// `notes` clears that field; an empty `site` or `secret` is rejected.
#[derive(Debug, Default)]
pub struct CredentialUpdate {
    pub site: Option<String>,
    pub secret: Option<SecretString>,
    pub username: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl CredentialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True if no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.site.is_none()
            && self.secret.is_none()
            && self.username.is_none()
            && self.url.is_none()
            && self.notes.is_none()
    }
}

/// Maps (owner, record id) to encrypted records.
pub struct CredentialStore<S> {
    storage: Arc<S>,
    keys: KeyManager<S>,
    locks: RecordLocks,
}

fn not_found(id: RecordId) -> VaultError {
    VaultError::NotFound(format!("credential {}", id))
}

impl<S: VaultStorage> CredentialStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            keys: KeyManager::new(Arc::clone(&storage)),
            storage,
            locks: RecordLocks::default(),
        }
    }

    /// Key manager sharing this store's backend.
    pub fn keys(&self) -> &KeyManager<S> {
        &self.keys
    }

    /// Encrypt and store a new credential for `owner`.
    ///
    /// # Errors
    ///
    /// - `VaultError::Validation` if the site or secret is empty or a field is too long
    /// - `VaultError::NotFound` if `owner` has no key material
    pub fn add_credential(&self, owner: &PrincipalId, credential: NewCredential) -> Result<RecordId> {
        let site = normalize_site(&credential.site)?;
        validate_secret(credential.secret.expose_secret())?;
        let metadata = normalize_metadata(&credential.metadata)?;

        let key = self.keys.get_key(owner)?;
        let cipher_text = crypto::encrypt(credential.secret.expose_secret(), &key)?;

        let id = self.storage.insert_record(&NewRecord {
            owner: owner.clone(),
            site,
            cipher_text,
            metadata,
            created_at: Utc::now(),
        })?;

        debug!(principal = %owner, record = %id, "added credential");
        Ok(id)
    }

    /// Fetch and decrypt one of `owner`'s credentials.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the record does not exist, belongs to
    /// another principal, or its token fails to decrypt (tampered/corrupted).
    pub fn get_credential(&self, owner: &PrincipalId, id: RecordId) -> Result<Credential> {
        let record = self
            .storage
            .get_record(owner, id)?
            .ok_or_else(|| not_found(id))?;
        let key = self.keys.get_key(owner)?;

        let secret = self.open_token(owner, id, &record.cipher_text, &key)?;

        Ok(Credential {
            id: record.id,
            site: record.site,
            secret,
            metadata: record.metadata,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn open_token(
        &self,
        owner: &PrincipalId,
        id: RecordId,
        token: &CipherToken,
        key: &crypto::KeyMaterial,
    ) -> Result<SecretString> {
        match crypto::decrypt(token, key) {
            Ok(plaintext) => Ok(SecretString::from(plaintext.as_str().to_owned())),
            Err(err) if err.is_undecryptable() => {
                warn!(
                    principal = %owner,
                    record = %id,
                    reason = %err,
                    "stored credential failed to decrypt"
                );
                Err(not_found(id))
            }
            Err(err) => Err(err),
        }
    }

    /// Apply a partial update to one of `owner`'s credentials.
    ///
    /// The secret is re-encrypted only when supplied; `updated_at` is always
    /// refreshed. Runs under the record's lock.
    ///
    /// # Errors
    ///
    /// - `VaultError::Validation` for an empty site/secret or an over-long field
    /// - `VaultError::NotFound` under the same ownership rule as [`Self::get_credential`]
    pub fn update_credential(
        &self,
        owner: &PrincipalId,
        id: RecordId,
        update: CredentialUpdate,
    ) -> Result<()> {
        let site = update.site.as_deref().map(normalize_site).transpose()?;
        if let Some(secret) = &update.secret {
            validate_secret(secret.expose_secret())?;
        }
        let username = update
            .username
            .as_deref()
            .map(|value| normalize_username(Some(value)))
            .transpose()?;
        let url = update
            .url
            .as_deref()
            .map(|value| normalize_url(Some(value)))
            .transpose()?;
        let notes = update
            .notes
            .as_deref()
            .map(|value| normalize_notes(Some(value)))
            .transpose()?;

        self.locks.with_record(id, || {
            let record = self
                .storage
                .get_record(owner, id)?
                .ok_or_else(|| not_found(id))?;

            let cipher_text = match &update.secret {
                Some(secret) => {
                    let key = self.keys.get_key(owner)?;
                    crypto::encrypt(secret.expose_secret(), &key)?
                }
                None => record.cipher_text,
            };

            let mut metadata = record.metadata;
            if let Some(value) = username {
                metadata.username = value;
            }
            if let Some(value) = url {
                metadata.url = value;
            }
            if let Some(value) = notes {
                metadata.notes = value;
            }

            self.storage.update_record(
                owner,
                id,
                &RecordUpdate {
                    site: site.unwrap_or(record.site),
                    cipher_text,
                    metadata,
                    updated_at: Utc::now(),
                },
            )
        })?;

        debug!(principal = %owner, record = %id, "updated credential");
        Ok(())
    }

    /// Delete one of `owner`'s credentials.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` under the ownership rule, and also for a
    /// repeated delete of the same id.
    pub fn delete_credential(&self, owner: &PrincipalId, id: RecordId) -> Result<()> {
        self.locks
            .with_record(id, || self.storage.delete_record(owner, id))?;
        debug!(principal = %owner, record = %id, "deleted credential");
        Ok(())
    }

    /// List `owner`'s credentials in creation order, without secrets.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if `owner` is not registered.
    pub fn list_credentials(&self, owner: &PrincipalId) -> Result<Vec<CredentialSummary>> {
        if !self.keys.has_key(owner)? {
            return Err(VaultError::NotFound(format!("principal {}", owner)));
        }
        self.storage.list_records(owner)
    }

    /// Number of credentials `owner` has stored.
    pub fn count_credentials(&self, owner: &PrincipalId) -> Result<usize> {
        self.storage.count_records(owner)
    }
}
