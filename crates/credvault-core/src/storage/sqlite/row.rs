//! Credential row type for database queries.

use chrono::{DateTime, Utc};

use crate::crypto::CipherToken;
use crate::error::{Result, VaultError};
use crate::storage::types::{
    CredentialMetadata, CredentialRecord, CredentialSummary, PrincipalId, RecordId,
};

/// Column list matching [`CredentialRow::from_row`].
pub(super) const CREDENTIAL_COLUMNS: &str =
    "id, owner, site, cipher_text, username, url, notes, created_at, updated_at";

/// Raw row data from the credentials table, before parsing into domain types.
#[derive(Debug)]
pub struct CredentialRow {
    pub id: i64,
    pub owner: String,
    pub site: String,
    pub cipher_text: String,
    pub username: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CredentialRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner: row.get(1)?,
            site: row.get(2)?,
            cipher_text: row.get(3)?,
            username: row.get(4)?,
            url: row.get(5)?,
            notes: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

pub(super) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| VaultError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = VaultError;

    fn try_from(row: CredentialRow) -> Result<Self> {
        let owner = PrincipalId::new(&row.owner)
            .map_err(|e| VaultError::Storage(format!("Invalid owner: {}", e)))?;
        let created_at = parse_timestamp(&row.created_at)?;
        let updated_at = parse_timestamp(&row.updated_at)?;

        Ok(CredentialRecord {
            id: RecordId::new(row.id),
            owner,
            site: row.site,
            cipher_text: CipherToken::from_string(row.cipher_text),
            metadata: CredentialMetadata {
                username: row.username,
                url: row.url,
                notes: row.notes,
            },
            created_at,
            updated_at,
        })
    }
}

impl TryFrom<CredentialRow> for CredentialSummary {
    type Error = VaultError;

    fn try_from(row: CredentialRow) -> Result<Self> {
        let record = CredentialRecord::try_from(row)?;
        Ok(CredentialSummary::from(&record))
    }
}
