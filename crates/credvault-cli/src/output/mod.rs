//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying credentials
//! as JSON or as human-readable text and tables.

mod json;
mod text;

// Re-export public API
pub use json::{credential_json, profile_json, summaries_json};
pub use text::{credential_table, print_credential, print_profile};
