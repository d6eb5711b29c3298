use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::crypto::{KeyError, UserKey};
use crate::user::UserId;

#[derive(thiserror::Error, Debug)]
pub enum KeyStoreError<T> {
    /// Backend failure not covered by the variants below
    #[error("unhandled key store provider error: {0}")]
    Provider(#[from] T),
    /// A key was already issued for this identity. Raised by the
    ///  storage layer's uniqueness constraint, so concurrent issuers
    ///  race safely
    #[error("a key is already issued for user {0}")]
    DuplicateKey(UserId),
    #[error("no key issued for user {0}")]
    NotFound(UserId),
    /// The backend could not be reached or timed out
    #[error("key storage unavailable: {0}")]
    Unavailable(String),
    #[error("key generation failed: {0}")]
    Generation(#[source] KeyError),
}

/// Storage of one symmetric key per user identity.
///
/// Implementations never log key bytes.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Associate `key` with `user_id`
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(KeyStoreError::DuplicateKey)` - a key already exists for `user_id`,
    ///   including when another caller inserted one concurrently
    async fn insert_key(
        &self,
        user_id: UserId,
        key: &UserKey,
    ) -> Result<(), KeyStoreError<Self::Error>>;

    /// Fetch the key for `user_id`
    ///
    /// * `Err(KeyStoreError::NotFound)` - no key was ever issued for `user_id`
    async fn get_key(&self, user_id: UserId) -> Result<UserKey, KeyStoreError<Self::Error>>;

    async fn has_key(&self, user_id: UserId) -> Result<bool, KeyStoreError<Self::Error>>;

    /// Generate a fresh random key and associate it with `user_id`
    async fn issue_key(&self, user_id: UserId) -> Result<UserKey, KeyStoreError<Self::Error>> {
        let key = UserKey::generate().map_err(KeyStoreError::Generation)?;
        self.insert_key(user_id, &key).await?;
        tracing::debug!(%user_id, "issued user key");
        Ok(key)
    }
}
