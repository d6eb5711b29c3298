use std::fmt;

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use super::key::UserKey;

/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the Poly1305 authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("failed to generate nonce: {0}")]
    Rng(String),
    #[error("encryption failed")]
    EncryptionFailed,
    /// Tampered ciphertext, tampered or malformed nonce, or the wrong key.
    #[error("decryption failed")]
    DecryptionFailed,
}

/// Ciphertext plus the nonce it was sealed with.
///
/// The nonce is not secret and is stored next to the ciphertext.
#[derive(Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
}

impl fmt::Debug for Sealed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealed")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("nonce_len", &self.nonce.len())
            .finish()
    }
}

/// Seal `plaintext` under `key` with ChaCha20-Poly1305.
///
/// A fresh random nonce is drawn for every call, so sealing the same
/// plaintext twice under the same key yields different ciphertexts.
pub fn encrypt(plaintext: &[u8], key: &UserKey) -> Result<Sealed, CipherError> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    getrandom::getrandom(&mut nonce_bytes).map_err(|e| CipherError::Rng(e.to_string()))?;

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.expose_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CipherError::EncryptionFailed)?;

    Ok(Sealed {
        ciphertext,
        nonce: nonce_bytes.to_vec(),
    })
}

/// Open a [`Sealed`] value under `key`.
///
/// # Errors
///
/// Returns [`CipherError::DecryptionFailed`] if:
/// - the nonce is not exactly `NONCE_SIZE` bytes
/// - the ciphertext is too short to carry a tag
/// - tag verification fails (tampered data or wrong key)
pub fn decrypt(sealed: &Sealed, key: &UserKey) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    if sealed.nonce.len() != NONCE_SIZE || sealed.ciphertext.len() < TAG_SIZE {
        return Err(CipherError::DecryptionFailed);
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.expose_bytes()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_ref())
        .map_err(|_| CipherError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}
