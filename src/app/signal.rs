use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Set `shutdown` on SIGINT or SIGTERM (Ctrl-C elsewhere).
///
/// The run checks the flag between URLs, so an interrupted run still closes
/// its browser session.
pub fn spawn_shutdown_listener(shutdown: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        warn!("Shutdown requested, finishing the current step");
        shutdown.store(true, Ordering::SeqCst);
    })
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let handlers = (signal(SignalKind::terminate()), signal(SignalKind::interrupt()));
    let (mut sigterm, mut sigint) = match handlers {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to set up signal handlers, falling back to Ctrl-C");
            ctrl_c_or_never().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c_or_never().await;
}

/// Resolve on Ctrl-C. If it can't be listened for, never resolve.
async fn ctrl_c_or_never() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
