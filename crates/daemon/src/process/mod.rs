pub mod utils;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::database::Database;
use crate::http_server::{self, HttpServerError};
use crate::{ServiceConfig, ServiceState};

/// How long in-flight requests get to drain once shutdown starts
const API_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle on a running service. Dropping it leaves the service running.
pub struct ShutdownHandle {
    signal_waiter: JoinHandle<()>,
    api: JoinHandle<Result<(), HttpServerError>>,
    database: Database,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Block until a signal or [`ShutdownHandle::shutdown`] stops the service,
    /// then drain the API and close the database pool
    pub async fn wait(self) {
        let _ = self.signal_waiter.await;

        match timeout(API_DRAIN_TIMEOUT, self.api).await {
            Ok(Ok(Ok(()))) => tracing::debug!("API server stopped"),
            Ok(Ok(Err(e))) => tracing::error!(error = %e, "API server failed"),
            Ok(Err(e)) => tracing::error!(error = %e, "API task panicked"),
            Err(_) => {
                tracing::error!(
                    timeout_secs = API_DRAIN_TIMEOUT.as_secs(),
                    "API did not drain in time"
                );
                std::process::exit(4);
            }
        }

        // checkpoints the WAL on the last connection
        self.database.close().await;
        tracing::info!("sealpost stopped");
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to set up service state: {0}")]
    State(#[from] crate::service_state::StateSetupError),
    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
}

/// Install the global subscriber, the panic hook and report the build.
/// The returned guards flush the non-blocking writers when dropped.
fn init_logging(service_config: &ServiceConfig) -> Vec<WorkerGuard> {
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(service_config.log_level.into())
            .from_env_lossy()
    };

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(filter());

    let file_layer = service_config.log_dir.as_ref().and_then(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("warning: not logging to {}: {}", log_dir.display(), e);
            return None;
        }

        let appender = tracing_appender::rolling::daily(log_dir, "sealpost.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);

        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(filter()),
        )
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Open storage and spawn the API server.
///
/// The returned [`ShutdownHandle`] must be awaited or shut down explicitly.
pub async fn start_service(
    service_config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), ServiceError> {
    let (signal_waiter, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker()?;
    let state = ServiceState::from_config(service_config).await?;

    let api_addr = SocketAddr::from(([0, 0, 0, 0], service_config.api_port));
    let api_config = http_server::Config::new(api_addr, service_config.log_level);
    let api = tokio::spawn(http_server::run_api(api_config, state.clone(), shutdown_rx));

    tracing::info!(
        port = service_config.api_port,
        sqlite = ?service_config.sqlite_path,
        max_content_length = service_config.max_content_length,
        "running sealpost API"
    );

    let handle = ShutdownHandle {
        signal_waiter,
        api,
        database: state.database().clone(),
        shutdown_tx,
    };

    Ok((state, handle))
}

/// Run the service until a shutdown signal arrives. Exits the process with
/// code 3 when storage cannot be opened.
pub async fn spawn_service(service_config: &ServiceConfig) {
    let _guards = init_logging(service_config);
    let handle = match start_service(service_config).await {
        Ok((_, handle)) => handle,
        Err(e) => {
            tracing::error!(error = %e, "error starting service");
            std::process::exit(3);
        }
    };
    handle.wait().await;
}
