//! Shutdown signal handling.
//!
//! The daemon runs until SIGINT or SIGTERM (Ctrl+C on non-Unix platforms).
//! The caller awaits [`wait_for_shutdown`] and runs its teardown once it
//! returns.

use tracing::info;

/// Resolve once any termination signal is received.
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.expect("failed to install Ctrl+C handler");
                info!("received SIGINT, shutting down");
            }
            _ = term.recv() => {
                info!("received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    }
}
