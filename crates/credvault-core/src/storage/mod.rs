//! Storage abstraction for Credvault.
//!
//! This module defines the `VaultStorage` trait and core types for
//! persisting principals, key material and encrypted credential records.
//!
//! ## Architecture
//!
//! The storage layer is backend-agnostic:
//! - `SqliteStorage`: durable relational store in a single SQLite file
//! - `MemoryStorage`: in-process store for tests and throwaway sessions
//!
//! Backends never see plaintext secrets; they persist cipher tokens produced
//! by the credential layer.

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::VaultStorage;
pub use types::{
    CredentialMetadata, CredentialRecord, CredentialSummary, NewPrincipal, NewRecord, Principal,
    PrincipalId, PrincipalProfile, RecordId, RecordUpdate,
};
