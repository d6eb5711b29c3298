//! Who may do what with a stored message.
//!
//! These are plain predicates over the caller identity and the record. The
//! read path calls [`can_decrypt`] on every record it is about to open, even
//! when the query that produced the record already filtered by recipient.

use crate::message::Message;
use crate::user::UserId;

/// Only the recipient may see the plaintext.
pub fn can_decrypt(caller: &UserId, message: &Message) -> bool {
    !caller.is_nil() && *caller == message.recipient_id
}

/// Only the (known) sender may replace the content. Anonymous messages are
/// immutable.
pub fn can_modify(caller: &UserId, message: &Message) -> bool {
    !caller.is_nil() && message.sender_id.as_ref() == Some(caller)
}

/// Recipient or known sender.
pub fn can_delete(caller: &UserId, message: &Message) -> bool {
    can_decrypt(caller, message) || can_modify(caller, message)
}

pub fn can_view_metadata(caller: &UserId, message: &Message) -> bool {
    can_delete(caller, message)
}
