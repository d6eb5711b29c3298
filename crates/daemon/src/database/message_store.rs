use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use common::crypto::Sealed;
use common::message_store::{MessageStore, MessageStoreError};
use common::prelude::{Message, MessageId, NewMessage, UserId};

use crate::database::types::DUuid;
use crate::database::{is_foreign_key_violation, is_unavailable, Database};

/// Row of the `messages` table
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub message_id: DUuid,
    pub sender_id: Option<DUuid>,
    pub recipient_id: DUuid,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.message_id.into(),
            sender_id: row.sender_id.map(Into::into),
            recipient_id: row.recipient_id.into(),
            sealed: Sealed {
                ciphertext: row.ciphertext,
                nonce: row.nonce,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn provider_error(err: sqlx::Error) -> MessageStoreError<sqlx::Error> {
    if is_unavailable(&err) {
        return MessageStoreError::Unavailable(err.to_string());
    }
    MessageStoreError::Provider(err)
}

#[async_trait]
impl MessageStore for Database {
    type Error = sqlx::Error;

    async fn save(&self, message: NewMessage) -> Result<MessageId, MessageStoreError<Self::Error>> {
        if message.recipient_id.is_nil() {
            return Err(MessageStoreError::Validation(
                "recipient is required".to_string(),
            ));
        }

        let message_id = MessageId::generate();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO messages (
                message_id, sender_id, recipient_id, ciphertext, nonce,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(DUuid::from(message_id))
        .bind(message.sender_id.map(DUuid::from))
        .bind(DUuid::from(message.recipient_id))
        .bind(message.sealed.ciphertext)
        .bind(message.sealed.nonce)
        .bind(now)
        .execute(&**self)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                MessageStoreError::Validation("recipient has no issued key".to_string())
            } else {
                provider_error(e)
            }
        })?;

        Ok(message_id)
    }

    /// Oldest first. `created_at` is assigned at insert, so `seq` follows it
    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Message>, MessageStoreError<Self::Error>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT
                message_id, sender_id, recipient_id, ciphertext, nonce,
                created_at, updated_at
            FROM messages
            WHERE recipient_id = ?1
            ORDER BY seq ASC
            "#,
        )
        .bind(DUuid::from(recipient_id))
        .fetch_all(&**self)
        .await
        .map_err(provider_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Message, MessageStoreError<Self::Error>> {
        sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT
                message_id, sender_id, recipient_id, ciphertext, nonce,
                created_at, updated_at
            FROM messages
            WHERE message_id = ?1
            "#,
        )
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await
        .map_err(provider_error)?
        .map(Message::from)
        .ok_or(MessageStoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: MessageId,
        sealed: Sealed,
    ) -> Result<(), MessageStoreError<Self::Error>> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET ciphertext = ?1, nonce = ?2, updated_at = ?3
            WHERE message_id = ?4
            "#,
        )
        .bind(sealed.ciphertext)
        .bind(sealed.nonce)
        .bind(OffsetDateTime::now_utc())
        .bind(DUuid::from(id))
        .execute(&**self)
        .await
        .map_err(provider_error)?;

        if result.rows_affected() == 0 {
            return Err(MessageStoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<(), MessageStoreError<Self::Error>> {
        let result = sqlx::query("DELETE FROM messages WHERE message_id = ?1")
            .bind(DUuid::from(id))
            .execute(&**self)
            .await
            .map_err(provider_error)?;

        if result.rows_affected() == 0 {
            return Err(MessageStoreError::NotFound(id));
        }
        Ok(())
    }
}
