//! Application-level utilities for the Credvault CLI.
//!
//! This module provides:
//! - Path resolution for the config file and vault database
//! - The per-invocation context that opens the vault

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
