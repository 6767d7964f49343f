//! Graceful shutdown with a bounded drain

use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Errors from running the server to completion
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("In-flight requests did not drain within {0:?}")]
    DrainTimeout(Duration),
}

/// Drive `server` until it finishes
///
/// Once `shutdown_token` is cancelled the server gets `drain_timeout` to
/// finish in-flight work; past that the call fails with
/// [`ShutdownError::DrainTimeout`].
pub async fn serve_until_drained<F>(
    server: F,
    shutdown_token: CancellationToken,
    drain_timeout: Duration,
) -> Result<(), ShutdownError>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return Ok(result?),
        _ = shutdown_token.cancelled() => {}
    }

    tracing::info!(timeout_seconds = drain_timeout.as_secs(), "Draining in-flight requests");

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ShutdownError::DrainTimeout(drain_timeout)),
    }
}

/// Cancel `shutdown_token` on Ctrl+C or SIGTERM
pub async fn cancel_on_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
        _ = shutdown_token.cancelled() => return,
    }

    shutdown_token.cancel();
}
