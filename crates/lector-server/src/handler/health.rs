//! Service health.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use lector_core::{RequestPipeline, ServiceStatus};
use serde::Serialize;

use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for health checks.
const TRACING_TARGET: &str = "lector_server::handler::health";

/// Health report returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: ServiceStatus,
    /// Name of the active recognition engine.
    pub engine: String,
}

/// Reports whether the recognition engine can serve requests.
///
/// Answers 200 when healthy and 503 otherwise; the reason is logged, not
/// returned.
#[tracing::instrument(skip_all)]
async fn health(State(pipeline): State<Arc<RequestPipeline>>) -> (StatusCode, Json<HealthResponse>) {
    let status = match pipeline.health_check().await {
        Ok(health) if health.is_healthy() => ServiceStatus::Healthy,
        Ok(health) => {
            tracing::warn!(
                target: TRACING_TARGET,
                engine = pipeline.engine_name(),
                message = health.message.as_deref().unwrap_or_default(),
                "engine reported unhealthy"
            );
            ServiceStatus::Unhealthy
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                engine = pipeline.engine_name(),
                error = %error,
                "engine health check failed"
            );
            ServiceStatus::Unhealthy
        }
    };

    let status_code = match status {
        ServiceStatus::Healthy => StatusCode::OK,
        ServiceStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status,
        engine: pipeline.engine_name().to_owned(),
    };

    (status_code, Json(response))
}

/// Returns a [`Router`] with the health route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}
