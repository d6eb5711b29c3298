use clap::Args;

use sealpost_daemon::state::AppState;
use sealpost_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (defaults to the logs/ directory in the config dir)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] sealpost_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let mut config = ServiceConfig::from_app_state(&state);
        if let Some(port) = self.api_port {
            config.api_port = port;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        if self.verbose {
            config.log_level = tracing::Level::DEBUG;
        }

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
