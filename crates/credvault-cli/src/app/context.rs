//! Application context for the Credvault CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use credvault_core::storage::SqliteStorage;
use credvault_core::AccessGate;

use crate::auth::EnvAuthenticator;
use crate::cli::Cli;
use crate::config::{read_config_or_default, CredvaultConfig};
use crate::errors::CliError;

use super::resolver::{missing_vault_message, resolve_config_path, resolve_db_path};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<CredvaultConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&CredvaultConfig> {
        self.config
            .get_or_try_init(|| read_config_or_default(&resolve_config_path()?))
    }

    /// Resolved vault database path.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        resolve_db_path(self.cli, self.config()?)
    }

    /// The collaborator that says who is calling.
    pub fn authenticator(&self) -> EnvAuthenticator {
        EnvAuthenticator::new(self.cli.user.clone())
    }

    /// Open an existing vault.
    pub fn open_gate(&self) -> anyhow::Result<AccessGate<SqliteStorage>> {
        let path = self.db_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_vault_message(&path),
                "Hint: Run `credvault init` to create the vault.",
            )
            .into());
        }
        let storage = SqliteStorage::open(&path)?;
        Ok(AccessGate::new(Arc::new(storage)))
    }
}
