//! HTTP server startup and graceful shutdown.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;

pub use self::error::{Result, ServerError};
use self::http_server::serve_http;
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;

/// Binds to the configured address and serves `app` until a shutdown signal.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(app: Router, config: ServerConfig) -> Result<()> {
    serve_http(app, config).await
}
