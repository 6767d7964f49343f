//! Bounded drain after a shutdown request

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use bearded_rust::{ShutdownError, serve_until_drained};

#[tokio::test]
async fn server_that_never_drains_times_out() {
    let token = CancellationToken::new();
    token.cancel();

    let result = serve_until_drained(
        std::future::pending::<std::io::Result<()>>(),
        token,
        Duration::from_millis(20),
    )
    .await;

    assert!(matches!(result, Err(ShutdownError::DrainTimeout(_))));
}

#[tokio::test]
async fn server_that_drains_in_time_is_clean() {
    let token = CancellationToken::new();
    let server_token = token.clone();
    let server = async move {
        server_token.cancelled().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<(), std::io::Error>(())
    };
    token.cancel();

    let result = serve_until_drained(server, token, Duration::from_secs(5)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn server_failure_before_shutdown_is_reported() {
    let result = serve_until_drained(
        async { Err::<(), _>(std::io::Error::other("address in use")) },
        CancellationToken::new(),
        Duration::from_secs(5),
    )
    .await;

    assert!(matches!(result, Err(ShutdownError::Serve(_))));
}
