use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use crate::database::Database;

/// Tables the service cannot run without
const REQUIRED_TABLES: [&str; 2] = ["user_keys", "messages"];

#[async_trait]
pub trait DataSource {
    /// Check that storage answers and carries the schema the service expects
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("database is not answering")]
    Unreachable,
    #[error("database schema is incomplete")]
    SchemaMissing,
}

/// Readiness source resolved per request from the router state
#[derive(Clone)]
pub struct StateDataSource(Arc<dyn DataSource + Send + Sync>);

impl std::fmt::Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish_non_exhaustive()
    }
}

impl StateDataSource {
    pub fn new(source: Arc<dyn DataSource + Send + Sync>) -> Self {
        Self(source)
    }

    pub async fn is_ready(&self) -> Result<(), DataSourceError> {
        self.0.is_ready().await
    }
}

struct DbSource(Database);

#[async_trait]
impl DataSource for DbSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        self.0.ping().await.map_err(|e| {
            tracing::warn!(error = %e, "database ping failed");
            DataSourceError::Unreachable
        })?;

        let found: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?, ?)",
        )
        .bind(REQUIRED_TABLES[0])
        .bind(REQUIRED_TABLES[1])
        .fetch_one(&*self.0)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "schema lookup failed");
            DataSourceError::Unreachable
        })?;

        if found != REQUIRED_TABLES.len() as i64 {
            tracing::warn!(found, "required tables missing");
            return Err(DataSourceError::SchemaMissing);
        }

        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StateDataSource
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ();

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource::new(Arc::new(DbSource(Database::from_ref(
            state,
        )))))
    }
}
