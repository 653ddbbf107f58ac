//! Server lifecycle with bounded graceful shutdown.
//!
//! On SIGINT/SIGTERM the listener stops accepting new connections and
//! in-flight requests get a fixed deadline to drain; after that the serve
//! future is abandoned with a warning.

use std::future::IntoFuture;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

/// How long in-flight requests get to finish after a shutdown signal.
pub const DRAIN_DEADLINE: Duration = Duration::from_secs(10);

/// Serves the router until a shutdown signal arrives, then drains.
pub async fn serve(
    listener: TcpListener,
    app: axum::Router,
    drain_deadline: Duration,
) -> std::io::Result<()> {
    let (drain_tx, mut drain_rx) = watch::channel(false);

    let graceful = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = drain_tx.send(true);
        })
        .into_future();

    let deadline = async move {
        // The clock only starts once shutdown has begun.
        let _ = drain_rx.wait_for(|draining| *draining).await;
        tokio::time::sleep(drain_deadline).await;
    };

    tokio::select! {
        result = graceful => {
            info!("HTTP server stopped");
            result
        }
        () = deadline => {
            warn!(?drain_deadline, "drain deadline exceeded, aborting in-flight requests");
            Ok(())
        }
    }
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
