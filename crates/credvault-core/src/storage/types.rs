//! Core data types for storage layer.
//!
//! Records are keyed by a synthetic numeric id with a foreign key to their
//! owning principal. Site names are not unique per owner.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{CipherToken, KeyMaterial};
use crate::error::{Result, VaultError};

/// Maximum characters for a principal identifier.
pub const MAX_PRINCIPAL_CHARS: usize = 120;

/// Identifier of an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a principal id, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if the id is empty or too long.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(VaultError::Validation(
                "Principal id cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_PRINCIPAL_CHARS {
            return Err(VaultError::Validation(format!(
                "Principal id too long (max {} characters)",
                MAX_PRINCIPAL_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthetic identifier of a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered principal (key material is fetched separately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub created_at: DateTime<Utc>,
}

/// A principal to insert together with its one and only key.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub id: PrincipalId,
    pub key: KeyMaterial,
    pub created_at: DateTime<Utc>,
}

/// Non-secret descriptive fields of a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMetadata {
    /// Account name at the site
    pub username: Option<String>,

    /// Login URL
    pub url: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// A stored credential record, secret still encrypted.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: RecordId,
    pub owner: PrincipalId,
    pub site: String,
    pub cipher_text: CipherToken,
    pub metadata: CredentialMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record to insert; the storage layer assigns the id.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub owner: PrincipalId,
    pub site: String,
    pub cipher_text: CipherToken,
    pub metadata: CredentialMetadata,
    pub created_at: DateTime<Utc>,
}

/// Full replacement of a record's mutable columns.
///
/// The credential layer reads the current record, applies a partial change,
/// re-encrypts if needed and writes the result back under the record lock.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    pub site: String,
    pub cipher_text: CipherToken,
    pub metadata: CredentialMetadata,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry: never carries plaintext or ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub id: RecordId,
    pub site: String,
    #[serde(flatten)]
    pub metadata: CredentialMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for CredentialSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            site: record.site.clone(),
            metadata: record.metadata.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Principal profile with record count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalProfile {
    pub id: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub credential_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id_trims() {
        let id = PrincipalId::new("  alice ").unwrap();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn test_principal_id_rejects_empty() {
        assert!(matches!(
            PrincipalId::new("   "),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn test_principal_id_rejects_too_long() {
        let long = "a".repeat(MAX_PRINCIPAL_CHARS + 1);
        assert!(PrincipalId::new(long).is_err());
        assert!(PrincipalId::new("a".repeat(MAX_PRINCIPAL_CHARS)).is_ok());
    }

    #[test]
    fn test_summary_json_has_no_secret_fields() {
        let summary = CredentialSummary {
            id: RecordId::new(7),
            site: "github".to_string(),
            metadata: CredentialMetadata {
                username: Some("alice".to_string()),
                url: None,
                notes: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["site"], "github");
        assert_eq!(json["username"], "alice");
        assert!(json.get("secret").is_none());
        assert!(json.get("cipher_text").is_none());
    }
}
