use async_trait::async_trait;
use zeroize::Zeroizing;

use common::crypto::UserKey;
use common::key_store::{KeyStore, KeyStoreError};
use common::prelude::UserId;

use crate::database::types::DUuid;
use crate::database::{is_unavailable, is_unique_violation, Database};

fn provider_error(err: sqlx::Error) -> KeyStoreError<sqlx::Error> {
    if is_unavailable(&err) {
        return KeyStoreError::Unavailable(err.to_string());
    }
    KeyStoreError::Provider(err)
}

#[async_trait]
impl KeyStore for Database {
    type Error = sqlx::Error;

    async fn insert_key(
        &self,
        user_id: UserId,
        key: &UserKey,
    ) -> Result<(), KeyStoreError<Self::Error>> {
        let id = DUuid::from(user_id);

        // the primary key on user_id settles concurrent issuers
        sqlx::query(
            r#"
            INSERT INTO user_keys (user_id, key)
            VALUES (?1, ?2)
            "#,
        )
        .bind(id)
        .bind(&key.expose_bytes()[..])
        .execute(&**self)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                KeyStoreError::DuplicateKey(user_id)
            } else {
                provider_error(e)
            }
        })?;

        Ok(())
    }

    async fn get_key(&self, user_id: UserId) -> Result<UserKey, KeyStoreError<Self::Error>> {
        let id = DUuid::from(user_id);

        let bytes: Option<Vec<u8>> = sqlx::query_scalar(
            r#"
            SELECT key
            FROM user_keys
            WHERE user_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&**self)
        .await
        .map_err(provider_error)?;

        let bytes = Zeroizing::new(bytes.ok_or(KeyStoreError::NotFound(user_id))?);
        UserKey::from_slice(&bytes).map_err(|e| {
            tracing::error!(%user_id, "stored key has the wrong size");
            KeyStoreError::Provider(sqlx::Error::Decode(Box::new(e)))
        })
    }

    async fn has_key(&self, user_id: UserId) -> Result<bool, KeyStoreError<Self::Error>> {
        let id = DUuid::from(user_id);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_keys
            WHERE user_id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&**self)
        .await
        .map_err(provider_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    async fn setup_test_db() -> Database {
        let db_url = url::Url::parse("sqlite::memory:").unwrap();
        Database::connect(&db_url).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = setup_test_db().await;
        let user = UserId::generate();
        let key = UserKey::generate().unwrap();

        assert!(!db.has_key(user).await.unwrap());
        db.insert_key(user, &key).await.unwrap();

        assert!(db.has_key(user).await.unwrap());
        assert_eq!(db.get_key(user).await.unwrap(), key);
    }

    #[tokio::test]
    async fn test_second_insert_is_duplicate() {
        let db = setup_test_db().await;
        let user = UserId::generate();
        let first = db.issue_key(user).await.unwrap();

        let result = db.insert_key(user, &UserKey::generate().unwrap()).await;
        assert!(matches!(result, Err(KeyStoreError::DuplicateKey(id)) if id == user));
        assert_eq!(db.get_key(user).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let db = setup_test_db().await;
        let user = UserId::generate();

        assert!(matches!(
            db.get_key(user).await,
            Err(KeyStoreError::NotFound(id)) if id == user
        ));
    }

    #[tokio::test]
    async fn test_corrupt_key_is_provider_error() {
        let db = setup_test_db().await;
        let user = UserId::generate();

        sqlx::query("INSERT INTO user_keys (user_id, key) VALUES (?1, ?2)")
            .bind(DUuid::from(user))
            .bind(vec![0u8; 7])
            .execute(&*db)
            .await
            .unwrap();

        assert!(matches!(
            db.get_key(user).await,
            Err(KeyStoreError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let db = setup_test_db().await;
        db.close().await;

        assert!(matches!(
            db.has_key(UserId::generate()).await,
            Err(KeyStoreError::Unavailable(_))
        ));
    }
}
