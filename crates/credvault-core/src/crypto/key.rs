//! Per-principal key material.
//!
//! Keys are 32 random bytes from the OS CSPRNG. They are independent of the
//! login password, so a password reset never orphans existing ciphertext.

use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Length of key material in bytes (32 bytes = 256 bits for ChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// Symmetric key material owned by exactly one principal.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl KeyMaterial {
    /// Generate fresh key material from the operating system's CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Crypto` if the OS random source is unavailable.
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LENGTH];
        getrandom::getrandom(&mut key)
            .map_err(|e| VaultError::Crypto(format!("Failed to generate key bytes: {}", e)))?;
        Ok(Self { key })
    }

    /// Rebuild key material loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Storage` if the stored value has the wrong length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|_| {
            VaultError::Storage(format!(
                "Stored key material has wrong length (expected {}, got {})",
                KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self { key })
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption
    /// operations or for handing to the persistence layer.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_length() {
        let key = KeyMaterial::generate().unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LENGTH);
    }

    #[test]
    fn test_generated_keys_differ() {
        let key1 = KeyMaterial::generate().unwrap();
        let key2 = KeyMaterial::generate().unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_generated_key_not_all_zero() {
        let key = KeyMaterial::generate().unwrap();
        assert!(key.as_bytes().iter().any(|b| *b != 0));
    }

    #[test]
    fn test_from_slice_round_trip() {
        let key = KeyMaterial::generate().unwrap();
        let restored = KeyMaterial::from_slice(key.as_bytes()).unwrap();
        assert_eq!(key.as_bytes(), restored.as_bytes());
    }

    #[test]
    fn test_from_slice_wrong_length_rejected() {
        let result = KeyMaterial::from_slice(&[7u8; 16]);
        assert!(matches!(result, Err(VaultError::Storage(_))));
        assert!(KeyMaterial::from_slice(&[]).is_err());
    }

    #[test]
    fn test_key_debug_redacts() {
        let key = KeyMaterial::generate().unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
