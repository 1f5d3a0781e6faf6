//! JSON output formatting for credentials.

use credvault_core::storage::{CredentialSummary, PrincipalProfile};
use credvault_core::Credential;
use secrecy::ExposeSecret;

/// Convert a decrypted credential to JSON, secret included.
pub fn credential_json(credential: &Credential) -> serde_json::Value {
    serde_json::json!({
        "id": credential.id,
        "site": credential.site,
        "secret": credential.secret.expose_secret(),
        "username": credential.metadata.username,
        "url": credential.metadata.url,
        "notes": credential.metadata.notes,
        "created_at": credential.created_at,
        "updated_at": credential.updated_at,
    })
}

/// Convert a credential listing to a JSON array.
pub fn summaries_json(summaries: &[CredentialSummary]) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(summaries)?)
}

pub fn profile_json(profile: &PrincipalProfile) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(profile)?)
}
