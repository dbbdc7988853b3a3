//! Batch recognition.

use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use lector_core::{BatchCoordinator, BatchEnvelope, RecognitionOptions};

use super::elapsed_ms;
use crate::extract::{Json, Query};
use crate::handler::{Error, Result};
use crate::service::ServiceState;

/// Tracing target for batch requests.
const TRACING_TARGET: &str = "lector_server::handler::batch";

/// Recognizes text in every image of a JSON array.
///
/// Items are taken as raw JSON so one malformed entry fails on its own
/// instead of rejecting the whole batch. A body that is not an array is a
/// request-level 400.
#[tracing::instrument(skip_all)]
async fn batch(
    State(coordinator): State<BatchCoordinator>,
    options: Result<Query<RecognitionOptions>, Error<'static>>,
    payload: Result<Json<Vec<serde_json::Value>>, Error<'static>>,
) -> Result<Json<BatchEnvelope>> {
    let start = Instant::now();
    let Query(options) = options.map_err(|error| error.with_processing_time(elapsed_ms(start)))?;
    let Json(sources) = payload.map_err(|error| error.with_processing_time(elapsed_ms(start)))?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = sources.len(),
        mode = ?options.mode,
        "batch received"
    );

    let envelope = coordinator.run_batch(sources, options).await;
    Ok(Json(envelope))
}

/// Returns a [`Router`] with the batch route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/batch", post(batch))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    use crate::handler::test::{create_test_server, white_png};

    #[tokio::test]
    async fn empty_batch() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.post("/batch").json(&json!([])).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([]));
        assert!(body["totalProcessingTimeMs"].is_u64());
        Ok(())
    }

    #[tokio::test]
    async fn mixed_batch_keeps_order() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let items = json!([
            { "base64": STANDARD.encode(white_png(10, 10)) },
            { "url": "https://evil.example/a.png" },
            "not an object",
            { "base64": STANDARD.encode(white_png(7, 5)) },
        ]);

        let response = server.post("/batch").json(&items).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let data = body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 4);

        assert_eq!(data[0]["success"], true);
        assert_eq!(data[0]["data"]["width"], 10);

        assert_eq!(data[1]["success"], false);
        assert_eq!(data[1]["error"], "Domain not allowed");

        assert_eq!(data[2]["success"], false);
        assert_eq!(data[2]["error"], "Invalid image source");

        assert_eq!(data[3]["success"], true);
        assert_eq!(data[3]["data"]["width"], 7);
        assert_eq!(data[3]["data"]["height"], 5);
        Ok(())
    }

    #[tokio::test]
    async fn all_failures_still_succeed() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let items = json!([{}, { "bytes": [1, 2, 3] }]);

        let response = server.post("/batch").json(&items).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["error"], "Invalid image source");
        assert_eq!(body["data"][1]["error"], "Failed to process image");
        Ok(())
    }

    #[tokio::test]
    async fn non_array_body_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/batch")
            .json(&json!({ "base64": "AAAA" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["processingTimeMs"].is_u64());
        Ok(())
    }
}
