//! Message orchestration
//!
//! [`MessageService`] is the only place that combines key lookups, sealing
//! and persistence. Every entry point takes the caller identity as an
//! explicit argument.
//!
//! Sending walks `Validated -> KeyResolved -> Encrypted -> Persisted`. The
//! content is fully sealed before the single persistence call, so a failed
//! send leaves nothing behind.
//!
//! Reading an inbox isolates failures per record: a record that does not open,
//! or that is not addressed to the caller, is reported in
//! [`Inbox::failures`] and the rest of the inbox is still returned.

mod error;
mod inbox;

use std::future::Future;
use std::time::Duration;

use crate::access;
use crate::crypto::{self, UserKey};
use crate::key_store::{KeyStore, KeyStoreError};
use crate::message::{DecryptedMessage, Message, MessageId, MessageSummary, NewMessage};
use crate::message_store::MessageStore;
use crate::user::UserId;

pub use error::MessageServiceError;
pub use inbox::{Inbox, InboxFailure, InboxFailureKind};

use error::{from_key_store, from_message_store};

/// Default cap on message content, in characters
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 1000;
/// Default bound on a single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ServiceLimits {
    /// Maximum content length in characters
    pub max_content_length: usize,
    /// Any single storage call taking longer than this fails with
    ///  `StorageUnavailable`
    pub storage_timeout: Duration,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageService<K, M> {
    keys: K,
    messages: M,
    limits: ServiceLimits,
}

impl<K, M> MessageService<K, M>
where
    K: KeyStore,
    M: MessageStore,
{
    pub fn new(keys: K, messages: M, limits: ServiceLimits) -> Self {
        Self {
            keys,
            messages,
            limits,
        }
    }

    pub fn limits(&self) -> &ServiceLimits {
        &self.limits
    }

    pub fn key_store(&self) -> &K {
        &self.keys
    }

    pub fn message_store(&self) -> &M {
        &self.messages
    }

    /// Create a new identity and issue its key
    pub async fn register(&self) -> Result<UserId, MessageServiceError> {
        let user_id = UserId::generate();
        self.issue_key(user_id).await?;
        tracing::info!(%user_id, "registered user");
        Ok(user_id)
    }

    /// Issue the key for an identity created elsewhere
    pub async fn issue_key(&self, user_id: UserId) -> Result<(), MessageServiceError> {
        if user_id.is_nil() {
            return Err(MessageServiceError::Validation(
                "user id is required".to_string(),
            ));
        }

        self.bounded("issue_key", self.keys.issue_key(user_id))
            .await?
            .map(|_key| ())
            .map_err(from_key_store)
    }

    /// Seal `content` under the recipient's key and store it
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn send(
        &self,
        sender_id: Option<UserId>,
        recipient_id: UserId,
        content: &str,
    ) -> Result<MessageId, MessageServiceError> {
        // Validated
        self.validate_content(content)?;
        if recipient_id.is_nil() {
            return Err(MessageServiceError::Validation(
                "recipient is required".to_string(),
            ));
        }

        // KeyResolved
        let key = match self.bounded("get_key", self.keys.get_key(recipient_id)).await? {
            Ok(key) => key,
            Err(KeyStoreError::NotFound(_)) => {
                return Err(MessageServiceError::RecipientKeyMissing(recipient_id))
            }
            Err(e) => return Err(from_key_store(e)),
        };

        // Encrypted
        let sealed = crypto::encrypt(content.as_bytes(), &key).map_err(|e| {
            tracing::error!(error = %e, "failed to seal message");
            MessageServiceError::Crypto
        })?;
        drop(key);

        // Persisted
        let message = NewMessage {
            sender_id,
            recipient_id,
            sealed,
        };
        let message_id = self
            .bounded("save", self.messages.save(message))
            .await?
            .map_err(from_message_store)?;

        tracing::info!(%message_id, "message stored");
        Ok(message_id)
    }

    /// Open every message addressed to `caller`
    #[tracing::instrument(skip(self))]
    pub async fn read_inbox(&self, caller: UserId) -> Result<Inbox, MessageServiceError> {
        if caller.is_nil() {
            return Err(MessageServiceError::Validation(
                "caller is required".to_string(),
            ));
        }

        let records = self
            .bounded("find_by_recipient", self.messages.find_by_recipient(caller))
            .await?
            .map_err(from_message_store)?;

        if records.is_empty() {
            return Ok(Inbox::default());
        }

        let key = match self.bounded("get_key", self.keys.get_key(caller)).await? {
            Ok(key) => key,
            Err(KeyStoreError::NotFound(_)) => {
                tracing::error!(
                    user_id = %caller,
                    records = records.len(),
                    "user has stored messages but no key"
                );
                return Err(MessageServiceError::KeyMissing(caller));
            }
            Err(e) => return Err(from_key_store(e)),
        };

        let mut inbox = Inbox::default();
        for record in records {
            match open_for(&caller, &record, &key) {
                Ok(message) => inbox.messages.push(message),
                Err(kind) => inbox.failures.push(InboxFailure {
                    message_id: record.id,
                    kind,
                }),
            }
        }

        tracing::debug!(
            delivered = inbox.messages.len(),
            failed = inbox.failures.len(),
            "inbox read"
        );
        Ok(inbox)
    }

    /// Replace the content of a message, sealing it again under the
    /// recipient's key
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn update_content(
        &self,
        caller: UserId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), MessageServiceError> {
        self.validate_content(content)?;

        let record = self.load_visible(&caller, message_id).await?;
        if !access::can_modify(&caller, &record) {
            return Err(MessageServiceError::Forbidden);
        }

        let recipient_id = record.recipient_id;
        let key = match self.bounded("get_key", self.keys.get_key(recipient_id)).await? {
            Ok(key) => key,
            Err(KeyStoreError::NotFound(_)) => {
                tracing::error!(%recipient_id, %message_id, "stored message has no recipient key");
                return Err(MessageServiceError::KeyMissing(recipient_id));
            }
            Err(e) => return Err(from_key_store(e)),
        };

        let sealed = crypto::encrypt(content.as_bytes(), &key).map_err(|e| {
            tracing::error!(error = %e, "failed to seal message");
            MessageServiceError::Crypto
        })?;
        drop(key);

        self.bounded("update", self.messages.update(message_id, sealed))
            .await?
            .map_err(from_message_store)?;

        tracing::info!("message content replaced");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        caller: UserId,
        message_id: MessageId,
    ) -> Result<(), MessageServiceError> {
        let record = self.load_visible(&caller, message_id).await?;
        if !access::can_delete(&caller, &record) {
            return Err(MessageServiceError::Forbidden);
        }

        self.bounded("delete", self.messages.delete(message_id))
            .await?
            .map_err(from_message_store)?;

        tracing::info!("message deleted");
        Ok(())
    }

    /// Metadata of a message the caller is party to
    pub async fn message_info(
        &self,
        caller: UserId,
        message_id: MessageId,
    ) -> Result<MessageSummary, MessageServiceError> {
        let record = self.load_visible(&caller, message_id).await?;
        Ok(MessageSummary::from(&record))
    }

    /// Load a record, reporting it as missing to anyone who is not a party
    /// to it
    async fn load_visible(
        &self,
        caller: &UserId,
        message_id: MessageId,
    ) -> Result<Message, MessageServiceError> {
        let record = self
            .bounded("find_by_id", self.messages.find_by_id(message_id))
            .await?
            .map_err(from_message_store)?;

        if !access::can_view_metadata(caller, &record) {
            tracing::debug!(user_id = %caller, %message_id, "caller is not a party to message");
            return Err(MessageServiceError::MessageNotFound(message_id));
        }

        Ok(record)
    }

    fn validate_content(&self, content: &str) -> Result<(), MessageServiceError> {
        if content.is_empty() {
            return Err(MessageServiceError::Validation(
                "content is required".to_string(),
            ));
        }

        let max = self.limits.max_content_length;
        if content.chars().count() > max {
            return Err(MessageServiceError::Validation(format!(
                "content exceeds {} characters",
                max
            )));
        }

        Ok(())
    }

    /// Bound a storage call by the configured timeout
    async fn bounded<F>(
        &self,
        operation: &'static str,
        call: F,
    ) -> Result<F::Output, MessageServiceError>
    where
        F: Future + Send,
    {
        tokio::time::timeout(self.limits.storage_timeout, call)
            .await
            .map_err(|_| {
                tracing::warn!(
                    operation,
                    timeout_ms = self.limits.storage_timeout.as_millis() as u64,
                    "storage call timed out"
                );
                MessageServiceError::StorageUnavailable
            })
    }
}

/// Decrypt one record for `caller`, or say why it was skipped
fn open_for(
    caller: &UserId,
    record: &Message,
    key: &UserKey,
) -> Result<DecryptedMessage, InboxFailureKind> {
    if !access::can_decrypt(caller, record) {
        tracing::warn!(
            message_id = %record.id,
            user_id = %caller,
            "store returned a message not addressed to the caller"
        );
        return Err(InboxFailureKind::IntegrityWarning);
    }

    let plaintext = crypto::decrypt(&record.sealed, key).map_err(|e| {
        tracing::warn!(message_id = %record.id, error = %e, "failed to open message");
        InboxFailureKind::DecryptionFailed
    })?;

    let content = std::str::from_utf8(&plaintext).map_err(|_| {
        tracing::warn!(message_id = %record.id, "opened message is not valid UTF-8");
        InboxFailureKind::DecryptionFailed
    })?;

    Ok(DecryptedMessage {
        message_id: record.id,
        sender_id: record.sender_id,
        content: content.to_owned(),
        created_at: record.created_at,
    })
}
