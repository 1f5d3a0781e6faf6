//! Storage engine trait definition.
//!
//! The `VaultStorage` trait is the persistence seam of the vault. Key material
//! and credential records live behind it so the core can run against an
//! in-memory fake in tests and a durable SQLite file in production without
//! touching the key or credential logic.

use crate::crypto::KeyMaterial;
use crate::error::Result;

use super::types::{
    CredentialRecord, CredentialSummary, NewPrincipal, NewRecord, Principal, PrincipalId,
    RecordId, RecordUpdate,
};

/// Persistence interface for principals, their keys and their records.
///
/// All implementations must ensure:
/// - Immediate consistency: a committed write is visible to the next read
/// - Every mutation is atomic (record plus ciphertext commit together or not at all)
/// - Record reads, updates and deletes are filtered by owner
/// - Deleting a principal cascades to its records
pub trait VaultStorage: Send + Sync {
    // --- Principal / key operations ---

    /// Insert a principal together with its key material.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Conflict` if the principal already exists. The
    /// existing key must be left untouched.
    fn insert_principal(&self, principal: &NewPrincipal) -> Result<()>;

    /// Get a principal by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(principal))` if found, `Ok(None)` if not found.
    fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>>;

    /// Get the key material of a principal.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the principal is unknown. Never returns default
    /// or empty key material.
    fn get_key(&self, id: &PrincipalId) -> Result<Option<KeyMaterial>>;

    /// Delete a principal, its key and all of its records.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the principal does not exist.
    fn delete_principal(&self, id: &PrincipalId) -> Result<()>;

    // --- Record operations ---

    /// Insert a new record.
    ///
    /// # Returns
    ///
    /// Returns the id assigned to the record. Ids are increasing, so id order
    /// is creation order.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the owner is not registered.
    fn insert_record(&self, record: &NewRecord) -> Result<RecordId>;

    /// Get a record owned by `owner`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` both when the id does not exist and when it belongs
    /// to another principal.
    fn get_record(&self, owner: &PrincipalId, id: RecordId) -> Result<Option<CredentialRecord>>;

    /// Overwrite the mutable columns of a record owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no such record exists for `owner`;
    /// an update never recreates a deleted record.
    fn update_record(&self, owner: &PrincipalId, id: RecordId, update: &RecordUpdate)
        -> Result<()>;

    /// Delete a record owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no such record exists for `owner`,
    /// including when it was already deleted.
    fn delete_record(&self, owner: &PrincipalId, id: RecordId) -> Result<()>;

    /// List the records of `owner` in creation order.
    fn list_records(&self, owner: &PrincipalId) -> Result<Vec<CredentialSummary>>;

    /// Count the records of `owner`.
    fn count_records(&self, owner: &PrincipalId) -> Result<usize>;

    // --- Maintenance operations ---

    /// Check storage integrity.
    ///
    /// Returns `Ok(())` if the store is consistent, or an error describing
    /// the problem.
    fn check_integrity(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn(_storage: &dyn VaultStorage) {}
    }
}
