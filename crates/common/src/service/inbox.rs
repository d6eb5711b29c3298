use serde::{Deserialize, Serialize};

use crate::message::{DecryptedMessage, MessageId};

/// Result of reading an inbox: everything that could be opened, plus one
/// entry per record that could not.
#[derive(Debug, Default)]
pub struct Inbox {
    pub messages: Vec<DecryptedMessage>,
    pub failures: Vec<InboxFailure>,
}

impl Inbox {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxFailure {
    pub message_id: MessageId,
    pub kind: InboxFailureKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxFailureKind {
    /// The record did not open under the caller's key, or the plaintext was
    ///  not valid UTF-8
    DecryptionFailed,
    /// The store handed back a record addressed to someone else
    IntegrityWarning,
}
