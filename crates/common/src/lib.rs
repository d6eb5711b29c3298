/**
 * Pure authorization predicates deciding who may
 *  read, edit or delete a stored message.
 */
pub mod access;
/**
 * Cryptographic types and operations.
 *  - Per-user symmetric keys
 *  - Authenticated encryption of message content
 */
pub mod crypto;
/**
 * Key material storage. One key per user identity,
 *  issued exactly once.
 */
pub mod key_store;
/**
 * Message record types, stored and decrypted.
 */
pub mod message;
/**
 * Ciphertext persistence, keyed by message id and
 *  indexed by recipient.
 */
pub mod message_store;
/**
 * Orchestration of send / inbox / edit / delete on top
 *  of the key store, the message store and the cipher.
 */
pub mod service;
/**
 * User identity.
 */
pub mod user;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::access;
    pub use crate::crypto::{Sealed, UserKey};
    pub use crate::key_store::{KeyStore, KeyStoreError, MemoryKeyStore};
    pub use crate::message::{DecryptedMessage, Message, MessageId, MessageSummary, NewMessage};
    pub use crate::message_store::{MemoryMessageStore, MessageStore, MessageStoreError};
    pub use crate::service::{
        Inbox, InboxFailure, InboxFailureKind, MessageService, MessageServiceError,
        ServiceLimits,
    };
    pub use crate::user::UserId;
    pub use crate::version::build_info;
}
