//! Request body size limiting middleware.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use tower_http::limit::RequestBodyLimitLayer;

use crate::TRACING_TARGET_MIDDLEWARE;
use crate::handler::ErrorKind;

/// Default maximum request body size: 24MB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 24 * 1024 * 1024;

/// Creates a request body size limit layer with a custom size.
pub fn create_body_limit_layer(max_size: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_size)
}

/// Extension trait for `axum::`[`Router`] to cap request bodies.
pub trait RouterBodyLimitExt<S> {
    /// Rejects bodies larger than `max_size` bytes with 413.
    ///
    /// `RequestBodyLimitLayer` answers early when `Content-Length` is too
    /// large; `DefaultBodyLimit` raises the extractor limit to match so
    /// chunked bodies are cut at the same size. Both paths answer with the
    /// failure envelope.
    fn with_body_limit(self, max_size: usize) -> Self;
}

impl<S> RouterBodyLimitExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_body_limit(self, max_size: usize) -> Self {
        self.layer(DefaultBodyLimit::max(max_size))
            .layer(create_body_limit_layer(max_size))
            .layer(map_response(into_envelope))
    }
}

/// Replaces the plain-text 413 produced by `RequestBodyLimitLayer`.
async fn into_envelope(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        tracing::debug!(
            target: TRACING_TARGET_MIDDLEWARE,
            "request body exceeded the size limit"
        );
        return ErrorKind::PayloadTooLarge.into_response();
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::routing::post;
    use axum_test::TestServer;

    use super::*;
    use crate::extract::Json;

    async fn echo(Json(value): Json<serde_json::Value>) -> Json<serde_json::Value> {
        Json(value)
    }

    fn server(max_size: usize) -> anyhow::Result<TestServer> {
        let router = Router::new()
            .route("/echo", post(echo))
            .with_body_limit(max_size);
        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn accepts_small_bodies() -> anyhow::Result<()> {
        let server = server(1024)?;
        let response = server.post("/echo").json(&serde_json::json!({"a": 1})).await;
        response.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_gets_envelope() -> anyhow::Result<()> {
        let server = server(64)?;
        let body = serde_json::json!({"base64": "A".repeat(1024)});

        let response = server.post("/echo").json(&body).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Request body too large");
        Ok(())
    }
}
