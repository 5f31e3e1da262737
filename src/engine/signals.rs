// src/engine/signals.rs

use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

/// Resolve on the first SIGINT (Ctrl-C) or SIGTERM.
///
/// This is a one-shot: it is not re-armed, so later signals have no further
/// effect on the dispatcher.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => info!(signal = "SIGINT", "caught signal"),
        _ = terminate => info!(signal = "SIGTERM", "caught signal"),
    }
}
