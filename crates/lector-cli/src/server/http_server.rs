//! HTTP server startup.

use axum::Router;
use tokio::net::TcpListener;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{Result, ServerError, shutdown_signal};

/// Starts an HTTP server with graceful shutdown.
pub(super) async fn serve_http(app: Router, server_config: ServerConfig) -> Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        let error = ServerError::bind_error(server_addr, err);
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %error,
            suggestion = error.suggestion(),
            "failed to bind to address"
        );
        error
    })?;

    let shutdown = shutdown_signal(server_config.shutdown_timeout());
    serve_with_shutdown(&server_config, || async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    })
    .await
}
