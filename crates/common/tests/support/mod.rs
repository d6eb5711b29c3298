//! Shared helpers for service integration tests
#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use common::crypto::{self, Sealed, UserKey};
use common::message_store::MemoryMessageStoreError;
use common::prelude::*;
use time::OffsetDateTime;

pub type MemoryService = MessageService<MemoryKeyStore, MemoryMessageStore>;

/// Service over fresh in-memory stores with default limits
pub fn setup_service() -> MemoryService {
    MessageService::new(
        MemoryKeyStore::new(),
        MemoryMessageStore::new(),
        ServiceLimits::default(),
    )
}

/// Register a user and return its id along with the issued key
pub async fn register_with_key(service: &MemoryService) -> (UserId, UserKey) {
    let user_id = service.register().await.unwrap();
    let key = service.key_store().get_key(user_id).await.unwrap();
    (user_id, key)
}

/// Build a stored record by hand, for planting rows the service would
///  never write
pub fn raw_message(sender: Option<UserId>, recipient: UserId, sealed: Sealed) -> Message {
    let now = OffsetDateTime::now_utc();
    Message {
        id: MessageId::generate(),
        sender_id: sender,
        recipient_id: recipient,
        sealed,
        created_at: now,
        updated_at: now,
    }
}

pub fn seal(plaintext: &[u8], key: &UserKey) -> Sealed {
    crypto::encrypt(plaintext, key).unwrap()
}

/// Message store whose recipient query also hands back rows addressed to
///  someone else
#[derive(Debug, Clone, Default)]
pub struct LeakyMessageStore {
    pub inner: MemoryMessageStore,
    pub leaked: Vec<Message>,
}

#[async_trait]
impl MessageStore for LeakyMessageStore {
    type Error = MemoryMessageStoreError;

    async fn save(&self, message: NewMessage) -> Result<MessageId, MessageStoreError<Self::Error>> {
        self.inner.save(message).await
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Message>, MessageStoreError<Self::Error>> {
        let mut records = self.inner.find_by_recipient(recipient_id).await?;
        records.extend(self.leaked.iter().cloned());
        Ok(records)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Message, MessageStoreError<Self::Error>> {
        self.inner.find_by_id(id).await
    }

    async fn update(
        &self,
        id: MessageId,
        sealed: Sealed,
    ) -> Result<(), MessageStoreError<Self::Error>> {
        self.inner.update(id, sealed).await
    }

    async fn delete(&self, id: MessageId) -> Result<(), MessageStoreError<Self::Error>> {
        self.inner.delete(id).await
    }
}

/// Message store that never answers in time
#[derive(Debug, Clone, Default)]
pub struct StalledMessageStore {
    pub delay: Duration,
}

impl StalledMessageStore {
    async fn stall(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl MessageStore for StalledMessageStore {
    type Error = MemoryMessageStoreError;

    async fn save(&self, _message: NewMessage) -> Result<MessageId, MessageStoreError<Self::Error>> {
        self.stall().await;
        Ok(MessageId::generate())
    }

    async fn find_by_recipient(
        &self,
        _recipient_id: UserId,
    ) -> Result<Vec<Message>, MessageStoreError<Self::Error>> {
        self.stall().await;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Message, MessageStoreError<Self::Error>> {
        self.stall().await;
        Err(MessageStoreError::NotFound(id))
    }

    async fn update(
        &self,
        _id: MessageId,
        _sealed: Sealed,
    ) -> Result<(), MessageStoreError<Self::Error>> {
        self.stall().await;
        Ok(())
    }

    async fn delete(&self, _id: MessageId) -> Result<(), MessageStoreError<Self::Error>> {
        self.stall().await;
        Ok(())
    }
}
