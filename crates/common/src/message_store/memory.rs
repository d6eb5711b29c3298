use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::provider::{MessageStore, MessageStoreError};
use crate::crypto::Sealed;
use crate::message::{Message, MessageId, NewMessage};
use crate::user::UserId;

/// In-memory message store
#[derive(Debug, Clone, Default)]
pub struct MemoryMessageStore {
    inner: Arc<RwLock<MemoryMessageStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryMessageStoreInner {
    /// Records keyed by insertion sequence
    entries: BTreeMap<u64, Message>,
    /// message id -> sequence
    index: HashMap<MessageId, u64>,
    next_seq: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryMessageStoreError {
    #[error("memory message store error: {0}")]
    Internal(String),
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing validation. Lets tests plant
    ///  corrupted or misaddressed rows.
    pub fn insert_raw(&self, message: Message) -> Result<(), MemoryMessageStoreError> {
        let mut inner = self.inner.write().map_err(|e| {
            MemoryMessageStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.index.insert(message.id, seq);
        inner.entries.insert(seq, message);
        Ok(())
    }

    fn lock_err(e: impl std::fmt::Display) -> MessageStoreError<MemoryMessageStoreError> {
        MessageStoreError::Provider(MemoryMessageStoreError::Internal(format!(
            "failed to acquire lock: {}",
            e
        )))
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    type Error = MemoryMessageStoreError;

    async fn save(&self, message: NewMessage) -> Result<MessageId, MessageStoreError<Self::Error>> {
        if message.recipient_id.is_nil() {
            return Err(MessageStoreError::Validation(
                "recipient is required".to_string(),
            ));
        }

        let mut inner = self.inner.write().map_err(Self::lock_err)?;

        let id = MessageId::generate();
        let now = OffsetDateTime::now_utc();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.index.insert(id, seq);
        inner.entries.insert(
            seq,
            Message {
                id,
                sender_id: message.sender_id,
                recipient_id: message.recipient_id,
                sealed: message.sealed,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Message>, MessageStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(Self::lock_err)?;

        // entries iterate in sequence order, the stable sort keeps it for equal timestamps
        let mut messages: Vec<Message> = inner
            .entries
            .values()
            .filter(|m| m.recipient_id == recipient_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);

        Ok(messages)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Message, MessageStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(Self::lock_err)?;

        inner
            .index
            .get(&id)
            .and_then(|seq| inner.entries.get(seq))
            .cloned()
            .ok_or(MessageStoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: MessageId,
        sealed: Sealed,
    ) -> Result<(), MessageStoreError<Self::Error>> {
        let mut inner = self.inner.write().map_err(Self::lock_err)?;

        let seq = *inner.index.get(&id).ok_or(MessageStoreError::NotFound(id))?;
        let message = inner
            .entries
            .get_mut(&seq)
            .ok_or(MessageStoreError::NotFound(id))?;
        message.sealed = sealed;
        message.updated_at = OffsetDateTime::now_utc();

        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<(), MessageStoreError<Self::Error>> {
        let mut inner = self.inner.write().map_err(Self::lock_err)?;

        let seq = inner
            .index
            .remove(&id)
            .ok_or(MessageStoreError::NotFound(id))?;
        inner.entries.remove(&seq);

        Ok(())
    }
}
