use std::path::PathBuf;

use credvault_core::storage::SqliteStorage;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_db_path, write_config, CredvaultConfig};
use crate::errors::CliError;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_log_level(value: Option<&str>) -> anyhow::Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let level = value.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(CliError::invalid_input(format!(
            "Invalid log level: {} (expected one of {})",
            value,
            LOG_LEVELS.join(", ")
        ))
        .into());
    }
    Ok(Some(level))
}

pub fn handle_init(ctx: &AppContext, db_flag: Option<&str>, args: &InitArgs) -> anyhow::Result<()> {
    let log_level = parse_log_level(args.log_level.as_deref())?;

    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let db_path = match args.path.as_deref().or(db_flag) {
        Some(path) => PathBuf::from(path),
        None => default_db_path()?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create vault directory {}: {}", parent.display(), e)
        })?;
    }

    let storage = SqliteStorage::open(&db_path)?;
    let metadata = storage.metadata()?;
    write_config(&config_path, &CredvaultConfig::new(&db_path, log_level))?;

    tracing::info!(path = %db_path.display(), "initialized vault");
    if !ctx.quiet() {
        println!("Initialized vault at {}", db_path.display());
        println!("- format version: {}", metadata.format_version);
        println!("- config: {}", config_path.display());
        println!();
        println!("Next: credvault --user <name> register");
    }
    Ok(())
}
