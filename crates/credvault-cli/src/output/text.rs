//! Text and table output formatting for credentials.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use credvault_core::storage::{CredentialSummary, PrincipalProfile};
use credvault_core::Credential;
use secrecy::ExposeSecret;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Print a single credential in human-readable format.
pub fn print_credential(credential: &Credential, quiet: bool) {
    if !quiet {
        println!("ID: {}", credential.id);
        println!("Site: {}", credential.site);
        if let Some(username) = &credential.metadata.username {
            println!("Username: {}", username);
        }
        if let Some(url) = &credential.metadata.url {
            println!("URL: {}", url);
        }
        println!("Created: {}", credential.created_at.format(TIMESTAMP_FORMAT));
        println!("Updated: {}", credential.updated_at.format(TIMESTAMP_FORMAT));
        if let Some(notes) = &credential.metadata.notes {
            println!("Notes: {}", notes);
        }
        println!();
    }
    println!("{}", credential.secret.expose_secret());
}

/// Render a credential listing as a table.
pub fn credential_table(summaries: &[CredentialSummary]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Site", "Username", "URL", "Updated"]);

    for summary in summaries {
        table.add_row(vec![
            summary.id.to_string(),
            summary.site.clone(),
            summary.metadata.username.clone().unwrap_or_default(),
            summary.metadata.url.clone().unwrap_or_default(),
            summary.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }
    table.to_string()
}

pub fn print_profile(profile: &PrincipalProfile) {
    println!("User: {}", profile.id);
    println!("Registered: {}", profile.created_at.format(TIMESTAMP_FORMAT));
    println!("Credentials: {}", profile.credential_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use credvault_core::storage::{CredentialMetadata, RecordId};

    #[test]
    fn test_table_lists_sites_without_secrets() {
        let now = Utc::now();
        let summaries = vec![CredentialSummary {
            id: RecordId::new(1),
            site: "github".to_string(),
            metadata: CredentialMetadata {
                username: Some("alice".to_string()),
                url: None,
                notes: Some("private note".to_string()),
            },
            created_at: now,
            updated_at: now,
        }];

        let rendered = credential_table(&summaries);
        assert!(rendered.contains("github"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("private note"));
    }
}
