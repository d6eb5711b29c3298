use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use uuid::Uuid;

use common::prelude::{MessageId, UserId};

/// Identifier column stored as hyphenated TEXT, so rows stay readable from
///  the sqlite shell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DUuid(Uuid);

macro_rules! id_conversions {
    ($($id:ty),*) => {
        $(
            impl From<$id> for DUuid {
                fn from(id: $id) -> Self {
                    Self(id.into())
                }
            }

            impl From<DUuid> for $id {
                fn from(val: DUuid) -> Self {
                    <$id>::from(val.0)
                }
            }
        )*
    };
}

id_conversions!(UserId, MessageId);

impl<'r> Decode<'r, Sqlite> for DUuid {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&'r str as Decode<'r, Sqlite>>::decode(value)?;
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|e| format!("invalid id column {:?}: {}", text, e).into())
    }
}

impl Encode<'_, Sqlite> for DUuid {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        let text = self.0.hyphenated().to_string();
        args.push(SqliteArgumentValue::Text(text.into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DUuid {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use crate::database::Database;

    use super::*;

    #[tokio::test]
    async fn test_stored_as_text() {
        let url = url::Url::parse("sqlite::memory:").unwrap();
        let db = Database::connect(&url).await.unwrap();
        let user = UserId::generate();

        let (text, back): (String, DUuid) = sqlx::query_as("SELECT ?1, ?1")
            .bind(DUuid::from(user))
            .fetch_one(&*db)
            .await
            .unwrap();

        assert_eq!(text, user.to_string());
        assert_eq!(UserId::from(back), user);
    }

    #[tokio::test]
    async fn test_garbage_fails_to_decode() {
        let url = url::Url::parse("sqlite::memory:").unwrap();
        let db = Database::connect(&url).await.unwrap();

        let result: Result<(DUuid,), _> = sqlx::query_as("SELECT 'not-a-uuid'")
            .fetch_one(&*db)
            .await;
        assert!(matches!(result, Err(sqlx::Error::ColumnDecode { .. })));
    }
}
