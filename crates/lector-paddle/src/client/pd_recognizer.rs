//! [`TextRecognizer`] implementation backed by a PaddleX pipeline.

use std::time::Instant;

use lector_core::{
    CanonicalImage, EngineError, EngineOutput, EngineRequest, ProgressEvent, ServiceHealth,
    TextRecognizer,
};

use crate::{PdClient, RECOGNIZER_TARGET};

#[async_trait::async_trait]
impl TextRecognizer for PdClient {
    fn name(&self) -> &str {
        "paddle"
    }

    async fn recognize(
        &self,
        image: &CanonicalImage,
        request: &EngineRequest,
    ) -> Result<EngineOutput, EngineError> {
        tracing::debug!(
            target: RECOGNIZER_TARGET,
            language = request.language(),
            "language is fixed by the pipeline deployment; hint ignored"
        );

        request.report(ProgressEvent::new("uploading image").with_progress(0.0));
        let output = self.recognize_png(image.data()).await?;
        request.report(ProgressEvent::new("recognizing text").with_progress(1.0));

        Ok(EngineOutput::new(output.text(), output.confidence()))
    }

    async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        let started = Instant::now();
        let health = match PdClient::health_check(self).await {
            Ok(()) => ServiceHealth::healthy(),
            Err(error) => {
                tracing::warn!(
                    target: RECOGNIZER_TARGET,
                    error = %error,
                    "PaddleX health check failed"
                );
                ServiceHealth::unhealthy(error.to_string())
            }
        };

        Ok(health.with_response_time(started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use axum::routing::post;
    use axum::{Json, Router};
    use bytes::Bytes;
    use lector_core::{ImageNormalizer, ProgressReporter};
    use serde_json::{Value, json};

    use super::*;
    use crate::PdConfig;

    async fn canonical_png() -> CanonicalImage {
        let image = image::RgbImage::from_pixel(3, 3, image::Rgb([0, 0, 0]));
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, image::ImageFormat::Png).unwrap();
        ImageNormalizer::new()
            .normalize(Bytes::from(png.into_inner()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn recognizes_through_pipeline() {
        let app = Router::new().route(
            "/ocr",
            post(|Json(_): Json<Value>| async {
                Json(json!({
                    "errorCode": 0,
                    "errorMsg": "Success",
                    "result": { "ocrResults": [{ "prunedResult": {
                        "rec_texts": ["hi"], "rec_scores": [0.5]
                    }}]}
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = PdClient::new(PdConfig::new(format!("http://{addr}")).unwrap()).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let request = EngineRequest::new("eng")
            .with_progress(ProgressReporter::new(move |e| sink.lock().unwrap().push(e)));

        let output = client.recognize(&canonical_png().await, &request).await.unwrap();

        assert_eq!(output.text, "hi");
        assert_eq!(output.confidence, 50.0);
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_pipeline_is_unhealthy() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = PdConfig::new(format!("http://127.0.0.1:{port}"))
            .unwrap()
            .with_max_retries(0);
        let client = PdClient::new(config).unwrap();

        let health = TextRecognizer::health_check(&client).await.unwrap();
        assert!(!health.is_healthy());
    }
}
