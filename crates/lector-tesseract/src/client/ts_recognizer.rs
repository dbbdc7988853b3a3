//! [`TextRecognizer`] implementation backed by the tesseract binary.

use std::time::Instant;

use lector_core::{
    CanonicalImage, EngineError, EngineOutput, EngineRequest, ProgressEvent, ServiceHealth,
    TextRecognizer,
};

use crate::{RECOGNIZER_TARGET, TsClient};

#[async_trait::async_trait]
impl TextRecognizer for TsClient {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(
        &self,
        image: &CanonicalImage,
        request: &EngineRequest,
    ) -> Result<EngineOutput, EngineError> {
        request.report(ProgressEvent::new("initializing tesseract").with_progress(0.0));

        let page = TsClient::recognize(self, image.data(), request.language(), |line| {
            request.report(ProgressEvent::new(line));
        })
        .await?;

        request.report(ProgressEvent::new("recognizing text").with_progress(1.0));

        tracing::debug!(
            target: RECOGNIZER_TARGET,
            language = request.language(),
            words = page.words.len(),
            "tesseract finished"
        );

        Ok(EngineOutput::new(page.text(), page.confidence()))
    }

    async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        let started = Instant::now();
        let health = match self.version().await {
            Ok(version) => {
                tracing::debug!(target: RECOGNIZER_TARGET, version = %version, "tesseract available");
                ServiceHealth::healthy()
            }
            Err(error) => {
                tracing::warn!(
                    target: RECOGNIZER_TARGET,
                    error = %error,
                    "tesseract health check failed"
                );
                ServiceHealth::unhealthy(error.to_string())
            }
        };

        Ok(health.with_response_time(started.elapsed()))
    }
}
