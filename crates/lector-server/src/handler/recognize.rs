//! Single-image recognition.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use lector_core::{Outcome, RecognitionOptions, RequestPipeline};

use super::elapsed_ms;
use crate::extract::{Json, Query};
use crate::handler::{Error, Result};
use crate::service::ServiceState;

/// Tracing target for recognition requests.
const TRACING_TARGET: &str = "lector_server::handler::recognize";

/// Recognizes text in the image described by the request body.
///
/// Answers 200 with a success outcome or 400 with a failure outcome. The
/// body is taken as raw JSON so a malformed source is reported as
/// `Invalid image source` like any other pipeline failure.
#[tracing::instrument(skip_all, fields(mode = tracing::field::Empty))]
async fn recognize(
    State(pipeline): State<Arc<RequestPipeline>>,
    options: Result<Query<RecognitionOptions>, Error<'static>>,
    payload: Result<Json<serde_json::Value>, Error<'static>>,
) -> Result<(StatusCode, Json<Outcome>)> {
    let start = Instant::now();
    let Query(options) = options.map_err(|error| error.with_processing_time(elapsed_ms(start)))?;
    let Json(source) = payload.map_err(|error| error.with_processing_time(elapsed_ms(start)))?;

    tracing::Span::current().record("mode", tracing::field::debug(options.mode));

    let outcome = pipeline.run(source, &options).await;
    let status_code = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    tracing::debug!(
        target: TRACING_TARGET,
        success = outcome.is_success(),
        processing_time_ms = outcome.processing_time_ms(),
        "recognition finished"
    );

    Ok((status_code, Json(outcome)))
}

/// Returns a [`Router`] with the recognition route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/recognize", post(recognize))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use lector_core::mock::{MockConfig, MockRecognizer};
    use lector_core::{
        CanonicalImage, EngineError, EngineOutput, EngineRequest, TextRecognizer,
    };
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_engine, white_png};

    /// Records the language and progress flag of every engine call.
    #[derive(Clone, Default)]
    struct RecordingRecognizer {
        seen: Arc<Mutex<Vec<(String, bool)>>>,
    }

    #[async_trait::async_trait]
    impl TextRecognizer for RecordingRecognizer {
        fn name(&self) -> &str {
            "recording"
        }

        async fn recognize(
            &self,
            _image: &CanonicalImage,
            request: &EngineRequest,
        ) -> Result<EngineOutput, EngineError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.language().to_owned(), request.reports_progress()));
            Ok(EngineOutput::new("recorded", 80.0))
        }
    }

    #[tokio::test]
    async fn recognizes_base64_png() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let body = json!({ "base64": STANDARD.encode(white_png(10, 10)) });

        let response = server.post("/recognize").json(&body).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["width"], 10);
        assert_eq!(body["data"]["height"], 10);
        assert_eq!(body["data"]["content"], "");
        assert!(body["data"]["processingTimeMs"].is_u64());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_domain_outside_allow_list() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let body = json!({ "url": "https://evil.example/a.png" });

        let response = server.post("/recognize").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Domain not allowed");
        assert!(body["processingTimeMs"].is_u64());
        assert!(body.get("data").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_empty_source() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.post("/recognize").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid image source");
        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_object_source() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.post("/recognize").json(&json!([1, 2, 3])).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid image source");
        Ok(())
    }

    #[tokio::test]
    async fn rejects_malformed_json() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/recognize")
            .text("{not json")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid JSON in request body");
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_mode() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let body = json!({ "base64": STANDARD.encode(white_png(2, 2)) });

        let response = server
            .post("/recognize")
            .add_query_param("mode", "turbo")
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid query parameters");
        Ok(())
    }

    #[tokio::test]
    async fn accurate_mode_with_languages() -> anyhow::Result<()> {
        let engine = RecordingRecognizer::default();
        let server = create_test_server_with_engine(engine.clone()).await?;
        let body = json!({ "base64": STANDARD.encode(white_png(2, 2)) });

        let response = server
            .post("/recognize")
            .add_query_param("mode", "accurate")
            .add_query_param("languages", "deu")
            .add_query_param("languages", "fra")
            .add_query_param("detect_language", true)
            .json(&body)
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["content"], "recorded");
        assert_eq!(*engine.seen.lock().unwrap(), vec![("deu".to_owned(), true)]);
        Ok(())
    }

    #[tokio::test]
    async fn ignores_unparseable_inert_options() -> anyhow::Result<()> {
        let engine = RecordingRecognizer::default();
        let server = create_test_server_with_engine(engine.clone()).await?;
        let body = json!({ "base64": STANDARD.encode(white_png(2, 2)) });

        for query in [
            "autocorrect=&detect_language=yes",
            "mode=fast&autocorrect=1",
            "detectLanguage=true&detect_language=true",
            "autocorrect=maybe&autocorrect=no&words=a&words=b",
        ] {
            let response = server
                .post("/recognize")
                .add_raw_query_param(query)
                .json(&body)
                .await;
            response.assert_status_ok();
        }

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|call| *call == ("eng".to_owned(), false)));
        Ok(())
    }

    #[tokio::test]
    async fn engine_failure_is_reported() -> anyhow::Result<()> {
        let engine = MockRecognizer::new(MockConfig {
            fail: true,
            ..Default::default()
        });
        let server = create_test_server_with_engine(engine).await?;
        let body = json!({ "base64": STANDARD.encode(white_png(2, 2)) });

        let response = server.post("/recognize").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to recognize text");
        Ok(())
    }
}
