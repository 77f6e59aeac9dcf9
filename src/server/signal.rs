// Signal handling module
//
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a task that wakes `shutdown` on the first SIGTERM or SIGINT
///
/// Registration happens before returning, so a failure to install a handler
/// is reported to the caller instead of panicking inside the task.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        log::info!("{name} received, shutting down gracefully");
        // notify_one stores a permit, so a signal that lands before the
        // accept loop starts waiting is not lost
        shutdown.notify_one();
    });
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            log::info!("Ctrl+C received, shutting down gracefully");
            shutdown.notify_one();
        }
    });
    Ok(())
}
