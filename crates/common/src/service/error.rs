use std::fmt::Display;

use crate::key_store::KeyStoreError;
use crate::message::MessageId;
use crate::message_store::MessageStoreError;
use crate::user::UserId;

/// Failures surfaced by [`MessageService`](super::MessageService).
///
/// Display strings are safe to hand to clients: they never carry key
/// material, ciphertext or backend internals. Backend detail is logged
/// where the failure is observed.
#[derive(Debug, thiserror::Error)]
pub enum MessageServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("recipient not found: {0}")]
    RecipientKeyMissing(UserId),
    /// A user with stored messages has no key. Server-side integrity problem
    #[error("key missing for user {0}")]
    KeyMissing(UserId),
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),
    #[error("not allowed to perform this action on the message")]
    Forbidden,
    #[error("a key is already issued for user {0}")]
    DuplicateKey(UserId),
    #[error("cryptographic operation failed")]
    Crypto,
    #[error("storage unavailable, try again later")]
    StorageUnavailable,
    #[error("storage failure")]
    Storage,
}

impl MessageServiceError {
    /// Retrying the same call later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, MessageServiceError::StorageUnavailable)
    }
}

/// Map key store failures that have no call-site specific meaning
pub(crate) fn from_key_store<E: Display>(err: KeyStoreError<E>) -> MessageServiceError {
    match err {
        KeyStoreError::Provider(e) => {
            tracing::error!(error = %e, "key store failure");
            MessageServiceError::Storage
        }
        KeyStoreError::Unavailable(reason) => {
            tracing::warn!(%reason, "key store unavailable");
            MessageServiceError::StorageUnavailable
        }
        KeyStoreError::DuplicateKey(user_id) => MessageServiceError::DuplicateKey(user_id),
        KeyStoreError::NotFound(user_id) => MessageServiceError::KeyMissing(user_id),
        KeyStoreError::Generation(e) => {
            tracing::error!(error = %e, "key generation failed");
            MessageServiceError::Crypto
        }
    }
}

pub(crate) fn from_message_store<E: Display>(err: MessageStoreError<E>) -> MessageServiceError {
    match err {
        MessageStoreError::Provider(e) => {
            tracing::error!(error = %e, "message store failure");
            MessageServiceError::Storage
        }
        MessageStoreError::Unavailable(reason) => {
            tracing::warn!(%reason, "message store unavailable");
            MessageServiceError::StorageUnavailable
        }
        MessageStoreError::Validation(reason) => MessageServiceError::Validation(reason),
        MessageStoreError::NotFound(id) => MessageServiceError::MessageNotFound(id),
    }
}
