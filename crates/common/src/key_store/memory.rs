use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::provider::{KeyStore, KeyStoreError};
use crate::crypto::UserKey;
use crate::user::UserId;

/// In-memory key store, mostly for tests and ephemeral nodes
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    inner: Arc<RwLock<HashMap<UserId, UserKey>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryKeyStoreError {
    #[error("memory key store error: {0}")]
    Internal(String),
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    type Error = MemoryKeyStoreError;

    async fn insert_key(
        &self,
        user_id: UserId,
        key: &UserKey,
    ) -> Result<(), KeyStoreError<Self::Error>> {
        let mut inner = self.inner.write().map_err(|e| {
            KeyStoreError::Provider(MemoryKeyStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        match inner.entry(user_id) {
            Entry::Occupied(_) => Err(KeyStoreError::DuplicateKey(user_id)),
            Entry::Vacant(slot) => {
                slot.insert(key.clone());
                Ok(())
            }
        }
    }

    async fn get_key(&self, user_id: UserId) -> Result<UserKey, KeyStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            KeyStoreError::Provider(MemoryKeyStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        inner
            .get(&user_id)
            .cloned()
            .ok_or(KeyStoreError::NotFound(user_id))
    }

    async fn has_key(&self, user_id: UserId) -> Result<bool, KeyStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            KeyStoreError::Provider(MemoryKeyStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        Ok(inner.contains_key(&user_id))
    }
}
