// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tokio::time::Instant;

use super::connection::accept_connection;
use crate::config::AppState;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Serve `listener` until `shutdown` is notified.
///
/// After shutdown the listener is closed, open connections are told to
/// finish their current request, and the call waits up to
/// `performance.shutdown_grace_period` seconds for them to go away.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (drain_tx, drain_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(
                        stream,
                        peer_addr,
                        &state,
                        &active_connections,
                        drain_rx.clone(),
                    ),
                    Err(e) => log::error!("failed to accept connection: {e}"),
                }
            }
            () = shutdown.notified() => break,
        }
    }

    let addr = listener.local_addr()?;
    drop(listener);
    drain_tx.send_replace(true);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    let open = active_connections.load(Ordering::SeqCst);
    log::info!("stopped accepting on {addr}, draining {open} connection(s) for up to {grace:?}");

    let deadline = Instant::now() + grace;
    while active_connections.load(Ordering::SeqCst) > 0 && Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    match active_connections.load(Ordering::SeqCst) {
        0 => log::info!("all connections closed"),
        n => log::warn!("grace period elapsed with {n} connection(s) still open"),
    }
    Ok(())
}
