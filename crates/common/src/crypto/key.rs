use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a user key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid key size, expected 32 bytes, got {0}")]
    InvalidSize(usize),
    #[error("failed to generate random bytes: {0}")]
    Rng(String),
}

/// A user's long-lived symmetric key.
///
/// Issued once at registration and used to seal every message addressed to
/// that user. The bytes are only reachable through [`UserKey::expose_bytes`],
/// which the cipher and the storage backends use.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserKey([u8; KEY_SIZE]);

impl UserKey {
    /// Generate a new random key using the OS CSPRNG
    pub fn generate() -> Result<Self, KeyError> {
        let mut buff = [0u8; KEY_SIZE];
        getrandom::getrandom(&mut buff).map_err(|e| KeyError::Rng(e.to_string()))?;
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    /// Load a key from raw bytes, e.g. a storage row
    pub fn from_slice(data: &[u8]) -> Result<Self, KeyError> {
        if data.len() != KEY_SIZE {
            return Err(KeyError::InvalidSize(data.len()));
        }
        let mut buff = [0u8; KEY_SIZE];
        buff.copy_from_slice(data);
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    pub fn expose_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl PartialEq for UserKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for UserKey {}

impl fmt::Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserKey").field(&"***").finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_is_random() {
        let a = UserKey::generate().unwrap();
        let b = UserKey::generate().unwrap();
        assert_ne!(a, b);
        assert_ne!(a.expose_bytes(), &[0u8; KEY_SIZE]);
    }

    #[test]
    fn test_key_size_validation() {
        assert!(matches!(
            UserKey::from_slice(&[1u8; 16]),
            Err(KeyError::InvalidSize(16))
        ));
        assert!(UserKey::from_slice(&[1u8; 64]).is_err());

        let key = UserKey::from_slice(&[7u8; KEY_SIZE]).unwrap();
        assert_eq!(key.expose_bytes(), &[7u8; KEY_SIZE]);
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = UserKey::from_slice(&[0xAB; KEY_SIZE]).unwrap();
        let printed = format!("{:?}", key);
        assert_eq!(printed, "UserKey(\"***\")");
    }
}
