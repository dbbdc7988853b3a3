use std::sync::Arc;
use std::time::Instant;

use super::{PipelineConfig, elapsed_ms};
use crate::{
    EngineError, ImageNormalizer, IntoImageSource, Outcome, PipelineError, RecognitionAdapter,
    RecognitionOptions, RecognitionResult, ServiceHealth, SourceResolver, TRACING_TARGET_PIPELINE,
    TextRecognizer,
};

/// Runs resolve, normalize and recognize for a single image.
///
/// Cloning is cheap; every clone shares the same HTTP client and engine.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    resolver: SourceResolver,
    normalizer: ImageNormalizer,
    adapter: RecognitionAdapter,
}

impl RequestPipeline {
    /// Assembles a pipeline from its stages.
    pub fn new(
        resolver: SourceResolver,
        normalizer: ImageNormalizer,
        adapter: RecognitionAdapter,
    ) -> Self {
        Self {
            resolver,
            normalizer,
            adapter,
        }
    }

    /// Builds a pipeline over `engine` from configuration.
    pub fn from_config(
        config: &PipelineConfig,
        engine: Arc<dyn TextRecognizer>,
    ) -> reqwest::Result<Self> {
        let resolver = SourceResolver::new(config.source_config())?;
        let adapter = RecognitionAdapter::new(engine).with_timeout(config.recognition_timeout);
        Ok(Self::new(resolver, ImageNormalizer::new(), adapter))
    }

    /// Name of the recognition engine.
    pub fn engine_name(&self) -> &str {
        self.adapter.engine_name()
    }

    /// Forwards a health check to the recognition engine.
    pub async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        self.adapter.health_check().await
    }

    /// Runs the pipeline and wraps the result in a timed [`Outcome`].
    ///
    /// Never fails: a failure in any stage becomes a failure outcome whose
    /// message is that stage's client-facing error text.
    pub async fn run(&self, source: impl IntoImageSource, options: &RecognitionOptions) -> Outcome {
        let start = Instant::now();
        let result = self.process(source, options).await;
        let processing_time_ms = elapsed_ms(start);

        match result {
            Ok(data) => {
                tracing::debug!(
                    target: TRACING_TARGET_PIPELINE,
                    width = data.width,
                    height = data.height,
                    chars = data.content.len(),
                    processing_time_ms = processing_time_ms,
                    "image recognized"
                );
                Outcome::success(data, processing_time_ms)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_PIPELINE,
                    stage = error.stage(),
                    error = %error,
                    detail = ?error,
                    processing_time_ms = processing_time_ms,
                    "image processing failed"
                );
                Outcome::failure(error.to_string(), processing_time_ms)
            }
        }
    }

    /// Runs the three stages in order, stopping at the first failure.
    pub async fn process(
        &self,
        source: impl IntoImageSource,
        options: &RecognitionOptions,
    ) -> Result<RecognitionResult, PipelineError> {
        let raw = self.resolver.resolve(source).await?;
        let image = self.normalizer.normalize(raw).await?;
        let result = self.adapter.recognize(&image, options).await?;
        Ok(result)
    }
}
