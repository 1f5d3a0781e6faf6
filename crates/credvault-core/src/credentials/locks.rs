//! Per-record mutual exclusion.
//!
//! Update and delete hold the lock of the record they touch across their
//! read-modify-write. Records under different ids never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, VaultError};
use crate::storage::RecordId;

#[derive(Default)]
pub(crate) struct RecordLocks {
    table: Mutex<HashMap<RecordId, Arc<Mutex<()>>>>,
}

impl RecordLocks {
    fn lock_table(&self) -> Result<MutexGuard<'_, HashMap<RecordId, Arc<Mutex<()>>>>> {
        self.table
            .lock()
            .map_err(|_| VaultError::Storage("Record lock table poisoned".to_string()))
    }

    /// Run `f` while holding the lock of record `id`.
    pub(crate) fn with_record<T>(&self, id: RecordId, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let handle = {
            let mut table = self.lock_table()?;
            Arc::clone(table.entry(id).or_default())
        };

        let result = {
            let _guard = handle
                .lock()
                .map_err(|_| VaultError::Storage(format!("Lock for credential {} poisoned", id)))?;
            f()
        };

        // Only the table and this handle left: nobody else is waiting.
        let mut table = self.lock_table()?;
        if Arc::strong_count(&handle) == 2 {
            table.remove(&id);
        }

        result
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock_table().map(|table| table.len()).unwrap_or(0)
    }
}
