//! Path resolution for config and vault files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_db_path, CredvaultConfig};

/// Resolve the config file path, checking CREDVAULT_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("CREDVAULT_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the vault database path: `--db`/`CREDVAULT_DB`, then config, then default.
pub fn resolve_db_path(cli: &Cli, config: &CredvaultConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.db_path() {
        return Ok(path);
    }
    default_db_path()
}

/// Error message when the vault database is missing.
pub fn missing_vault_message(path: &Path) -> String {
    format!(
        "No vault found at {}\n\nRun:\n  credvault init\n\nOr specify a vault path:\n  CREDVAULT_DB=/path/to/vault.db credvault init",
        path.display()
    )
}
