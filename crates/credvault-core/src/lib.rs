//! # Credvault Core
//!
//! Core library for Credvault - a per-user encrypted credential store.
//!
//! Users are registered once, receive their own randomly generated key, and
//! then store named site credentials that are encrypted at rest under that key.
//! This crate holds the encryption-at-rest subsystem independent of any
//! front end (CLI, HTTP, ...).
//!
//! ## Architecture
//!
//! - **crypto**: key material and the AEAD token codec
//! - **storage**: persistence trait plus SQLite and in-memory backends
//! - **keys**: per-principal key lifecycle (`KeyManager`)
//! - **credentials**: plaintext-boundary CRUD over encrypted records (`CredentialStore`)
//! - **gate**: binds an authenticated principal to every operation (`AccessGate`)
//!
//! Control flow: `AccessGate` resolves the principal, `KeyManager` yields its key,
//! and `CredentialStore` encrypts or decrypts with that key internally.

pub mod credentials;
pub mod crypto;
pub mod error;
pub mod gate;
pub mod keys;
pub mod storage;

pub use credentials::{Credential, CredentialStore, CredentialUpdate, NewCredential};
pub use error::{ErrorKind, Result, VaultError};
pub use gate::{AccessGate, Authenticator, Session};
pub use keys::KeyManager;
pub use storage::VaultStorage;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
