//! Cryptographic operations for Credvault.
//!
//! This module provides per-principal key material and the authenticated
//! encryption used for credential records:
//! - **ChaCha20-Poly1305**: AEAD with a 256-bit key, 96-bit nonce and 128-bit tag
//! - **OS randomness**: key material and nonces come from the operating system CSPRNG
//!
//! ## Security Model
//!
//! - One random key per principal, generated at registration and never derived
//!   from the login password
//! - A fresh random nonce for every encryption call
//! - Key material zeroized from memory on drop and redacted from `Debug`
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the credential database without the key table
//! - Tampering with stored tokens (detected by the authentication tag)
//! - One principal decrypting another principal's records
//!
//! We do NOT defend against:
//! - Theft of the whole database including the key table (no key wrapping)
//! - Compromised host / access to process memory

pub mod cipher;
pub mod key;

pub use cipher::{decrypt, encrypt, CipherToken, NONCE_SIZE, TAG_SIZE};
pub use key::{KeyMaterial, KEY_LENGTH};
