use clap::Args;

use sealpost_daemon::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Maximum message length, in characters
    #[arg(long, default_value_t = 1000)]
    pub max_content_length: usize,

    /// Seconds a single storage call may take
    #[arg(long, default_value_t = 5)]
    pub storage_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] sealpost_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            max_content_length: self.max_content_length,
            storage_timeout_secs: self.storage_timeout_secs,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized sealpost directory at: {}\n\
             - Config: {}\n\
             - Database: {}\n\
             - API port: {}",
            state.app_dir.display(),
            state.config_path.display(),
            state.db_path.display(),
            state.config.api_port,
        );

        Ok(output)
    }
}
