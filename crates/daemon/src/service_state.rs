use axum::extract::FromRef;
use url::Url;

use common::prelude::MessageService;

use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// The message service over SQLite, with both stores on one pool
pub type SqliteMessageService = MessageService<Database, Database>;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    messages: SqliteMessageService,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!(url = %sqlite_database_url, "connecting to database");
        let database = Database::connect(&sqlite_database_url).await?;

        Ok(Self::from_database(database, config))
    }

    pub fn from_database(database: Database, config: &Config) -> Self {
        let messages = MessageService::new(database.clone(), database.clone(), config.limits());
        Self { database, messages }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn messages(&self) -> &SqliteMessageService {
        &self.messages
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}
