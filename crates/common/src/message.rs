use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::Sealed;
use crate::user::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for MessageId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<MessageId> for Uuid {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message about to be persisted. Content is already sealed.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Absent for anonymous sends
    pub sender_id: Option<UserId>,
    pub recipient_id: UserId,
    pub sealed: Sealed,
}

/// A persisted message record
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: Option<UserId>,
    pub recipient_id: UserId,
    pub sealed: Sealed,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Plaintext view of a message, only ever built for its recipient.
///
/// The content is wiped when the value is dropped.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DecryptedMessage {
    #[zeroize(skip)]
    pub message_id: MessageId,
    #[zeroize(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<UserId>,
    pub content: String,
    #[zeroize(skip)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl fmt::Debug for DecryptedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptedMessage")
            .field("message_id", &self.message_id)
            .field("sender_id", &self.sender_id)
            .field("content_len", &self.content.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Metadata of a message, without ciphertext or plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub message_id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<UserId>,
    pub recipient_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Message> for MessageSummary {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}
