//! Credential input validation and normalization.

use crate::error::{Result, VaultError};
use crate::storage::CredentialMetadata;

/// Maximum characters for a site name.
pub const MAX_SITE_CHARS: usize = 100;

/// Maximum characters for a username.
pub const MAX_USERNAME_CHARS: usize = 100;

/// Maximum characters for a URL.
pub const MAX_URL_CHARS: usize = 255;

/// Trim and validate a site name.
pub fn normalize_site(site: &str) -> Result<String> {
    let trimmed = site.trim();
    if trimmed.is_empty() {
        return Err(VaultError::Validation("Site name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_SITE_CHARS {
        return Err(VaultError::Validation(format!(
            "Site name too long (max {} characters)",
            MAX_SITE_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a secret value. Secrets are stored verbatim, never trimmed.
pub fn validate_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(VaultError::Validation("Secret is required".to_string()));
    }
    Ok(())
}

/// Trim an optional text field; blank values become `None`.
pub fn normalize_optional(
    field: &str,
    value: Option<&str>,
    max_chars: Option<usize>,
) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            return Err(VaultError::Validation(format!(
                "{} too long (max {} characters)",
                field, max
            )));
        }
    }
    Ok(Some(trimmed.to_string()))
}

pub fn normalize_username(value: Option<&str>) -> Result<Option<String>> {
    normalize_optional("Username", value, Some(MAX_USERNAME_CHARS))
}

pub fn normalize_url(value: Option<&str>) -> Result<Option<String>> {
    normalize_optional("URL", value, Some(MAX_URL_CHARS))
}

/// Notes are free text with no length limit.
pub fn normalize_notes(value: Option<&str>) -> Result<Option<String>> {
    normalize_optional("Notes", value, None)
}

/// Normalize every metadata field.
pub fn normalize_metadata(metadata: &CredentialMetadata) -> Result<CredentialMetadata> {
    Ok(CredentialMetadata {
        username: normalize_username(metadata.username.as_deref())?,
        url: normalize_url(metadata.url.as_deref())?,
        notes: normalize_notes(metadata.notes.as_deref())?,
    })
}
