use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Log level used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CredvaultConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    pub level: Option<String>,
}

impl CredvaultConfig {
    pub fn new(db_path: &Path, log_level: Option<String>) -> Self {
        Self {
            storage: StorageSection {
                path: Some(db_path.to_string_lossy().to_string()),
            },
            logging: LoggingSection { level: log_level },
        }
    }

    /// Configured database path, if any.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CredvaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<CredvaultConfig> {
    if !path.exists() {
        return Ok(CredvaultConfig::default());
    }
    read_config(path)
}

pub fn write_config(path: &Path, config: &CredvaultConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("credvault"));
        }
    }
    Ok(home_dir()?.join(".config").join("credvault"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("credvault"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("credvault"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
