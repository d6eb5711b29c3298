use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::crypto::Sealed;
use crate::message::{Message, MessageId, NewMessage};
use crate::user::UserId;

#[derive(thiserror::Error, Debug)]
pub enum MessageStoreError<T> {
    #[error("unhandled message store provider error: {0}")]
    Provider(#[from] T),
    /// The record is structurally invalid, e.g. it has no recipient
    #[error("invalid message: {0}")]
    Validation(String),
    #[error("message not found: {0}")]
    NotFound(MessageId),
    /// The backend could not be reached or timed out
    #[error("message storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for sealed message records.
///
/// Each call is atomic on its own; no multi-record transactions are
/// expected from implementations.
#[async_trait]
pub trait MessageStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Persist a new record and return its id
    ///
    /// * `Err(MessageStoreError::Validation)` - `recipient_id` is nil
    async fn save(&self, message: NewMessage) -> Result<MessageId, MessageStoreError<Self::Error>>;

    /// All records addressed to `recipient_id`, oldest first.
    ///  Returns an empty vec, never an error, when there are none
    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Message>, MessageStoreError<Self::Error>>;

    async fn find_by_id(&self, id: MessageId) -> Result<Message, MessageStoreError<Self::Error>>;

    /// Replace the sealed content of a record. Sender and recipient
    ///  are left untouched
    async fn update(
        &self,
        id: MessageId,
        sealed: Sealed,
    ) -> Result<(), MessageStoreError<Self::Error>>;

    async fn delete(&self, id: MessageId) -> Result<(), MessageStoreError<Self::Error>>;
}
