//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lector_core::mock::MockRecognizer;
//! use lector_server::handler::routes;
//! use lector_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = Arc::new(MockRecognizer::default());
//! let state = ServiceState::from_config(&ServiceConfig::default(), engine)?;
//! let app: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod batch;
mod error;
mod health;
mod recognize;
mod response;

use std::time::Instant;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::health::HealthResponse;
pub use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Milliseconds since `start`, rounded to the nearest integer.
fn elapsed_ms(start: Instant) -> u64 {
    (start.elapsed().as_secs_f64() * 1000.0).round() as u64
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(recognize::routes())
        .merge(batch::routes())
        .merge(health::routes())
        .fallback(handler)
}
