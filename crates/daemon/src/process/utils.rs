use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay between SIGTERM and closing the listener
const SIGTERM_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
enum ShutdownReason {
    Requested,
    Interrupt,
    Terminate,
}

/// Spawn a task that waits for SIGINT, SIGTERM or a programmatic request and
/// then notifies every receiver of the returned watch channel.
#[allow(clippy::type_complexity)]
pub fn graceful_shutdown_blocker(
) -> std::io::Result<(JoinHandle<()>, watch::Sender<()>, watch::Receiver<()>)> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let (tx, rx) = watch::channel(());
    let signal_tx = tx.clone();
    let mut requested = rx.clone();

    let handle = tokio::spawn(async move {
        let reason = tokio::select! {
            _ = requested.changed() => ShutdownReason::Requested,
            _ = sigint.recv() => ShutdownReason::Interrupt,
            _ = sigterm.recv() => ShutdownReason::Terminate,
        };
        tracing::info!(?reason, "shutting down");

        match reason {
            // receivers were already notified by the requester
            ShutdownReason::Requested => return,
            ShutdownReason::Terminate => tokio::time::sleep(SIGTERM_GRACE_PERIOD).await,
            ShutdownReason::Interrupt => {}
        }

        let _ = signal_tx.send(());
    });

    Ok((handle, tx, rx))
}

/// Route panics through `tracing`
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| {
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        match panic.location() {
            Some(loc) => tracing::error!(
                message = %panic,
                thread,
                panic.file = loc.file(),
                panic.line = loc.line(),
            ),
            None => tracing::error!(message = %panic, thread),
        }
    }));
}

pub fn report_build_info() {
    let build = common::prelude::build_info();

    tracing::info!(
        version = build.version,
        build_profile = build.build_profile,
        features = build.build_features,
        built_at = build.build_timestamp,
        rustc = build.rust_version,
        "sealpost starting up"
    );
}
