//! Authenticated encryption of credential secrets.
//!
//! Each call seals one secret string under one principal's key with
//! ChaCha20-Poly1305 and a fresh random nonce. The result is a self-contained
//! token:
//!
//! ```text
//! token = base64( nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! so decryption needs only the token and the key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use crate::crypto::key::KeyMaterial;
use crate::error::{Result, VaultError};

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Opaque encrypted token as persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken(String);

impl CipherToken {
    /// Wrap a token string read back from storage.
    ///
    /// No validation happens here; malformed tokens surface as
    /// `VaultError::Format` from [`decrypt`].
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn cipher_for(key: &KeyMaterial) -> ChaCha20Poly1305 {
    ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
}

/// Encrypt a secret string under `key`.
///
/// # Security
///
/// A new random nonce is drawn from the OS CSPRNG on every call, so encrypting
/// the same plaintext twice yields different tokens.
///
/// # Examples
///
/// ```
/// use credvault_core::crypto::{decrypt, encrypt, KeyMaterial};
///
/// let key = KeyMaterial::generate().unwrap();
/// let token = encrypt("p@ss1", &key).unwrap();
/// assert_eq!(decrypt(&token, &key).unwrap().as_str(), "p@ss1");
/// ```
pub fn encrypt(plaintext: &str, key: &KeyMaterial) -> Result<CipherToken> {
    let cipher = cipher_for(key);
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| VaultError::Crypto("AEAD encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);

    Ok(CipherToken(STANDARD.encode(out)))
}

/// Decrypt a token produced by [`encrypt`].
///
/// # Errors
///
/// - `VaultError::Format` if the token is not valid base64, is too short to
///   hold a nonce and tag, or the authenticated payload is not UTF-8
/// - `VaultError::Authentication` if the tag does not verify (wrong key,
///   tampered or corrupted token). No partial plaintext is ever returned.
pub fn decrypt(token: &CipherToken, key: &KeyMaterial) -> Result<Zeroizing<String>> {
    let raw = STANDARD
        .decode(token.as_str())
        .map_err(|e| VaultError::Format(format!("invalid base64: {}", e)))?;

    if raw.len() < NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::Format(format!(
            "token too short ({} bytes, need at least {})",
            raw.len(),
            NONCE_SIZE + TAG_SIZE
        )));
    }

    let (nonce_bytes, sealed) = raw.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = Zeroizing::new(
        cipher_for(key)
            .decrypt(nonce, sealed)
            .map_err(|_| VaultError::Authentication)?,
    );

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| VaultError::Format("decrypted payload is not UTF-8".to_string()))?;

    Ok(Zeroizing::new(text.to_owned()))
}
