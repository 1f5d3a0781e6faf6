//! Error types for Credvault core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Messages never carry plaintext secrets, key bytes or cipher tokens; the
//! outer layer (CLI, HTTP) maps [`ErrorKind`] to a fixed exit or status code.

use thiserror::Error;

/// Result type alias for Credvault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for Credvault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Bad input shape (empty site, empty secret, field too long)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record or key absent, including records owned by another principal
    #[error("Not found: {0}")]
    NotFound(String),

    /// AEAD tag did not verify (tampered token, wrong key, corrupted data)
    #[error("Authentication tag mismatch")]
    Authentication,

    /// Stored token is structurally malformed
    #[error("Malformed cipher token: {0}")]
    Format(String),

    /// Authenticated principal does not match the requested owner
    #[error("Unauthorized")]
    Unauthorized,

    /// No authenticated principal could be resolved
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Duplicate key generation or similar state conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Randomness or cipher primitive failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Coarse classification used by outer layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authentication,
    Format,
    Unauthorized,
    Unauthenticated,
    Conflict,
    Internal,
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::Validation(_) => ErrorKind::Validation,
            VaultError::NotFound(_) => ErrorKind::NotFound,
            VaultError::Authentication => ErrorKind::Authentication,
            VaultError::Format(_) => ErrorKind::Format,
            VaultError::Unauthorized => ErrorKind::Unauthorized,
            VaultError::Unauthenticated => ErrorKind::Unauthenticated,
            VaultError::Conflict(_) => ErrorKind::Conflict,
            VaultError::Crypto(_)
            | VaultError::Storage(_)
            | VaultError::Sqlite { .. }
            | VaultError::Io { .. } => ErrorKind::Internal,
        }
    }

    /// True for the two cipher failures that indicate a corrupted or foreign token.
    pub fn is_undecryptable(&self) -> bool {
        matches!(self, VaultError::Authentication | VaultError::Format(_))
    }
}
