//! SQLite storage backend.
//!
//! A single SQLite file holds the principal table (with each principal's key
//! material) and the credential table (cipher tokens plus non-secret
//! metadata). Foreign keys cascade principal deletion to credentials.

mod row;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use zeroize::Zeroizing;

use crate::crypto::KeyMaterial;
use crate::error::{Result, VaultError};
use crate::storage::traits::VaultStorage;
use crate::storage::types::{
    CredentialRecord, CredentialSummary, NewPrincipal, NewRecord, Principal, PrincipalId,
    RecordId, RecordUpdate,
};

use row::{parse_timestamp, CredentialRow, CREDENTIAL_COLUMNS};

/// On-disk format version written to the `meta` table.
pub const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS principals (
        id TEXT PRIMARY KEY,
        key_material BLOB NOT NULL,
        created_at TEXT NOT NULL
    );

    -- Site names are deliberately not unique per owner
    CREATE TABLE IF NOT EXISTS credentials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        site TEXT NOT NULL,
        cipher_text TEXT NOT NULL,
        username TEXT,
        url TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,

        FOREIGN KEY(owner) REFERENCES principals(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS credentials_owner ON credentials (owner);
"#;

/// Store-level metadata from the `meta` table.
#[derive(Debug, Clone)]
pub struct StoreMetadata {
    pub format_version: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// SQLite-backed storage engine.
pub struct SqliteStorage {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) a vault database at `path`.
    ///
    /// The schema is created if missing. Opening a database written by an
    /// unknown format version fails with `VaultError::Storage`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None)
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::migrate(&mut conn)?;
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    fn migrate(conn: &mut Connection) -> Result<()> {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        let version: Option<String> = tx
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match version {
            None => {
                let now = Utc::now().to_rfc3339();
                tx.execute(
                    "INSERT INTO meta (key, value) VALUES (?, ?)",
                    ["format_version", FORMAT_VERSION],
                )?;
                tx.execute(
                    "INSERT INTO meta (key, value) VALUES (?, ?)",
                    ["created_at", now.as_str()],
                )?;
                tx.execute(
                    "INSERT INTO meta (key, value) VALUES (?, ?)",
                    ["last_modified", now.as_str()],
                )?;
            }
            Some(found) if found == FORMAT_VERSION => {}
            Some(found) => {
                return Err(VaultError::Storage(format!(
                    "Unsupported vault format version: {}",
                    found
                )));
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("SQLite connection poisoned".to_string()))
    }

    fn touch(conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read store metadata.
    pub fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;
        let read = |key: &str| -> Result<String> {
            Ok(conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
                row.get(0)
            })?)
        };

        Ok(StoreMetadata {
            format_version: read("format_version")?,
            created_at: parse_timestamp(&read("created_at")?)?,
            last_modified: parse_timestamp(&read("last_modified")?)?,
        })
    }
}

impl VaultStorage for SqliteStorage {
    fn insert_principal(&self, principal: &NewPrincipal) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO principals (id, key_material, created_at) VALUES (?, ?, ?)",
            params![
                principal.id.as_str(),
                &principal.key.as_bytes()[..],
                principal.created_at.to_rfc3339()
            ],
        )?;
        if inserted == 0 {
            return Err(VaultError::Conflict(format!(
                "Principal {} already has key material",
                principal.id
            )));
        }

        Self::touch(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>> {
        let conn = self.lock_conn()?;
        let created_at: Option<String> = conn
            .query_row(
                "SELECT created_at FROM principals WHERE id = ?",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match created_at {
            Some(value) => Ok(Some(Principal {
                id: id.clone(),
                created_at: parse_timestamp(&value)?,
            })),
            None => Ok(None),
        }
    }

    fn get_key(&self, id: &PrincipalId) -> Result<Option<KeyMaterial>> {
        let conn = self.lock_conn()?;
        let bytes: Option<Vec<u8>> = conn
            .query_row(
                "SELECT key_material FROM principals WHERE id = ?",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        bytes
            .map(|value| {
                let value = Zeroizing::new(value);
                KeyMaterial::from_slice(&value)
            })
            .transpose()
    }

    fn delete_principal(&self, id: &PrincipalId) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM principals WHERE id = ?", [id.as_str()])?;
        if deleted == 0 {
            return Err(VaultError::NotFound(format!("principal {}", id)));
        }

        Self::touch(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_record(&self, record: &NewRecord) -> Result<RecordId> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let owner_exists: Option<String> = tx
            .query_row(
                "SELECT id FROM principals WHERE id = ?",
                [record.owner.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if owner_exists.is_none() {
            return Err(VaultError::NotFound(format!("principal {}", record.owner)));
        }

        let created_at = record.created_at.to_rfc3339();
        tx.execute(
            r#"
            INSERT INTO credentials (
                owner,
                site,
                cipher_text,
                username,
                url,
                notes,
                created_at,
                updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.owner.as_str(),
                record.site,
                record.cipher_text.as_str(),
                record.metadata.username,
                record.metadata.url,
                record.metadata.notes,
                created_at,
                created_at,
            ],
        )?;
        let id = RecordId::new(tx.last_insert_rowid());

        Self::touch(&tx)?;
        tx.commit()?;
        Ok(id)
    }

    fn get_record(&self, owner: &PrincipalId, id: RecordId) -> Result<Option<CredentialRecord>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM credentials WHERE id = ? AND owner = ?",
                    CREDENTIAL_COLUMNS
                ),
                params![id.get(), owner.as_str()],
                CredentialRow::from_row,
            )
            .optional()?;

        row.map(CredentialRecord::try_from).transpose()
    }

    fn update_record(
        &self,
        owner: &PrincipalId,
        id: RecordId,
        update: &RecordUpdate,
    ) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            r#"
            UPDATE credentials
            SET site = ?, cipher_text = ?, username = ?, url = ?, notes = ?, updated_at = ?
            WHERE id = ? AND owner = ?
            "#,
            params![
                update.site,
                update.cipher_text.as_str(),
                update.metadata.username,
                update.metadata.url,
                update.metadata.notes,
                update.updated_at.to_rfc3339(),
                id.get(),
                owner.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(VaultError::NotFound(format!("credential {}", id)));
        }

        Self::touch(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_record(&self, owner: &PrincipalId, id: RecordId) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute(
            "DELETE FROM credentials WHERE id = ? AND owner = ?",
            params![id.get(), owner.as_str()],
        )?;
        if deleted == 0 {
            return Err(VaultError::NotFound(format!("credential {}", id)));
        }

        Self::touch(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn list_records(&self, owner: &PrincipalId) -> Result<Vec<CredentialSummary>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM credentials WHERE owner = ? ORDER BY id ASC",
            CREDENTIAL_COLUMNS
        ))?;
        let rows = stmt.query_map([owner.as_str()], CredentialRow::from_row)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(CredentialSummary::try_from(row?)?);
        }
        Ok(summaries)
    }

    fn count_records(&self, owner: &PrincipalId) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM credentials WHERE owner = ?",
            [owner.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| VaultError::Storage(format!("Invalid record count: {}", count)))
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(VaultError::Storage(format!(
                "SQLite integrity check failed: {}",
                status
            )));
        }

        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_some() {
            return Err(VaultError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        let bad_keys: i64 = conn.query_row(
            "SELECT COUNT(*) FROM principals WHERE length(key_material) != ?",
            [crate::crypto::KEY_LENGTH as i64],
            |row| row.get(0),
        )?;
        if bad_keys > 0 {
            return Err(VaultError::Storage(format!(
                "{} principal(s) have key material of the wrong length",
                bad_keys
            )));
        }

        let metadata_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM meta WHERE key IN ('format_version', 'created_at', 'last_modified')",
            [],
            |row| row.get(0),
        )?;
        if metadata_count < 3 {
            return Err(VaultError::Storage(
                "Metadata table missing required keys".to_string(),
            ));
        }

        Ok(())
    }
}
