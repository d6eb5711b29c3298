//! Cryptographic primitives for sealpost
//!
//! Every registered user owns exactly one 256-bit [`UserKey`]. Message content
//! addressed to a user is sealed under that user's key with ChaCha20-Poly1305,
//! so only the holder of the recipient's key can open it.
//!
//! # Security Model
//!
//! - Keys are random, never derived from passwords, redacted from `Debug`
//!   output and zeroed on drop.
//! - Every [`encrypt`] call draws a fresh 96-bit nonce from the OS RNG. Nonces
//!   are never fixed, counted or derived from the content.
//! - The AEAD tag covers the whole ciphertext, so any flipped byte in the
//!   ciphertext or the nonce, or a wrong key, surfaces as
//!   [`CipherError::DecryptionFailed`] instead of garbled plaintext.
//! - Opened plaintext is handed back in a [`Zeroizing`](zeroize::Zeroizing)
//!   buffer.

mod cipher;
mod key;

pub use cipher::{decrypt, encrypt, CipherError, Sealed, NONCE_SIZE, TAG_SIZE};
pub use key::{KeyError, UserKey, KEY_SIZE};
