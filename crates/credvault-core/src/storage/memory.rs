//! In-memory storage backend.
//!
//! Same semantics as the SQLite backend, held in a `Mutex`-guarded map.
//! Nothing survives the process; use it for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::crypto::KeyMaterial;
use crate::error::{Result, VaultError};
use crate::storage::traits::VaultStorage;
use crate::storage::types::{
    CredentialRecord, CredentialSummary, NewPrincipal, NewRecord, Principal, PrincipalId,
    RecordId, RecordUpdate,
};

struct StoredPrincipal {
    key: KeyMaterial,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    principals: BTreeMap<PrincipalId, StoredPrincipal>,
    records: BTreeMap<RecordId, CredentialRecord>,
    last_id: i64,
}

/// In-memory storage engine.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| VaultError::Storage("Memory store poisoned".to_string()))
    }
}

impl VaultStorage for MemoryStorage {
    fn insert_principal(&self, principal: &NewPrincipal) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.principals.contains_key(&principal.id) {
            return Err(VaultError::Conflict(format!(
                "Principal {} already has key material",
                principal.id
            )));
        }
        state.principals.insert(
            principal.id.clone(),
            StoredPrincipal {
                key: principal.key.clone(),
                created_at: principal.created_at,
            },
        );
        Ok(())
    }

    fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>> {
        let state = self.lock_state()?;
        Ok(state.principals.get(id).map(|stored| Principal {
            id: id.clone(),
            created_at: stored.created_at,
        }))
    }

    fn get_key(&self, id: &PrincipalId) -> Result<Option<KeyMaterial>> {
        let state = self.lock_state()?;
        Ok(state.principals.get(id).map(|stored| stored.key.clone()))
    }

    fn delete_principal(&self, id: &PrincipalId) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.principals.remove(id).is_none() {
            return Err(VaultError::NotFound(format!("principal {}", id)));
        }
        state.records.retain(|_, record| &record.owner != id);
        Ok(())
    }

    fn insert_record(&self, record: &NewRecord) -> Result<RecordId> {
        let mut state = self.lock_state()?;
        if !state.principals.contains_key(&record.owner) {
            return Err(VaultError::NotFound(format!("principal {}", record.owner)));
        }
        state.last_id += 1;
        let id = RecordId::new(state.last_id);
        state.records.insert(
            id,
            CredentialRecord {
                id,
                owner: record.owner.clone(),
                site: record.site.clone(),
                cipher_text: record.cipher_text.clone(),
                metadata: record.metadata.clone(),
                created_at: record.created_at,
                updated_at: record.created_at,
            },
        );
        Ok(id)
    }

    fn get_record(&self, owner: &PrincipalId, id: RecordId) -> Result<Option<CredentialRecord>> {
        let state = self.lock_state()?;
        Ok(state
            .records
            .get(&id)
            .filter(|record| &record.owner == owner)
            .cloned())
    }

    fn update_record(
        &self,
        owner: &PrincipalId,
        id: RecordId,
        update: &RecordUpdate,
    ) -> Result<()> {
        let mut state = self.lock_state()?;
        let record = state
            .records
            .get_mut(&id)
            .filter(|record| &record.owner == owner)
            .ok_or_else(|| VaultError::NotFound(format!("credential {}", id)))?;
        record.site = update.site.clone();
        record.cipher_text = update.cipher_text.clone();
        record.metadata = update.metadata.clone();
        record.updated_at = update.updated_at;
        Ok(())
    }

    fn delete_record(&self, owner: &PrincipalId, id: RecordId) -> Result<()> {
        let mut state = self.lock_state()?;
        let owned = state
            .records
            .get(&id)
            .is_some_and(|record| &record.owner == owner);
        if !owned {
            return Err(VaultError::NotFound(format!("credential {}", id)));
        }
        state.records.remove(&id);
        Ok(())
    }

    fn list_records(&self, owner: &PrincipalId) -> Result<Vec<CredentialSummary>> {
        let state = self.lock_state()?;
        Ok(state
            .records
            .values()
            .filter(|record| &record.owner == owner)
            .map(CredentialSummary::from)
            .collect())
    }

    fn count_records(&self, owner: &PrincipalId) -> Result<usize> {
        let state = self.lock_state()?;
        Ok(state
            .records
            .values()
            .filter(|record| &record.owner == owner)
            .count())
    }

    fn check_integrity(&self) -> Result<()> {
        let state = self.lock_state()?;
        if let Some(orphan) = state
            .records
            .values()
            .find(|record| !state.principals.contains_key(&record.owner))
        {
            return Err(VaultError::Storage(format!(
                "Credential {} references missing principal",
                orphan.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherToken;
    use crate::storage::types::CredentialMetadata;

    fn principal(name: &str) -> NewPrincipal {
        NewPrincipal {
            id: PrincipalId::new(name).unwrap(),
            key: KeyMaterial::generate().unwrap(),
            created_at: Utc::now(),
        }
    }

    fn record(owner: &PrincipalId, site: &str) -> NewRecord {
        NewRecord {
            owner: owner.clone(),
            site: site.to_string(),
            cipher_text: CipherToken::from_string("token"),
            metadata: CredentialMetadata::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_principal_conflicts_and_keeps_key() {
        let storage = MemoryStorage::new();
        let first = principal("alice");
        storage.insert_principal(&first).unwrap();

        let result = storage.insert_principal(&principal("alice"));
        assert!(matches!(result, Err(VaultError::Conflict(_))));

        let stored = storage.get_key(&first.id).unwrap().unwrap();
        assert_eq!(stored.as_bytes(), first.key.as_bytes());
    }

    #[test]
    fn test_record_requires_registered_owner() {
        let storage = MemoryStorage::new();
        let ghost = PrincipalId::new("ghost").unwrap();
        let result = storage.insert_record(&record(&ghost, "github"));
        assert!(matches!(result, Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_ids_increase_and_list_in_creation_order() {
        let storage = MemoryStorage::new();
        let alice = principal("alice");
        storage.insert_principal(&alice).unwrap();

        let first = storage.insert_record(&record(&alice.id, "zeta")).unwrap();
        let second = storage.insert_record(&record(&alice.id, "alpha")).unwrap();
        assert!(second > first);

        let sites: Vec<String> = storage
            .list_records(&alice.id)
            .unwrap()
            .into_iter()
            .map(|summary| summary.site)
            .collect();
        assert_eq!(sites, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_foreign_owner_sees_nothing() {
        let storage = MemoryStorage::new();
        let alice = principal("alice");
        let bob = principal("bob");
        storage.insert_principal(&alice).unwrap();
        storage.insert_principal(&bob).unwrap();
        let id = storage.insert_record(&record(&alice.id, "github")).unwrap();

        assert!(storage.get_record(&bob.id, id).unwrap().is_none());
        assert!(storage.delete_record(&bob.id, id).is_err());
        assert!(storage.get_record(&alice.id, id).unwrap().is_some());
    }

    #[test]
    fn test_delete_principal_cascades() {
        let storage = MemoryStorage::new();
        let alice = principal("alice");
        storage.insert_principal(&alice).unwrap();
        let id = storage.insert_record(&record(&alice.id, "github")).unwrap();

        storage.delete_principal(&alice.id).unwrap();
        assert!(storage.get_key(&alice.id).unwrap().is_none());
        assert!(storage.get_record(&alice.id, id).unwrap().is_none());
        assert_eq!(storage.count_records(&alice.id).unwrap(), 0);
        storage.check_integrity().unwrap();
    }
}
