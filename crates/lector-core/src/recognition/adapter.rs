use std::sync::Arc;
use std::time::Duration;

use super::{
    EngineRequest, ProgressEvent, ProgressReporter, RecognitionOptions, RecognitionResult,
    TextRecognizer,
};
use crate::{
    CanonicalImage, EngineError, RecognitionError, ServiceHealth, TRACING_TARGET_PROGRESS,
    TRACING_TARGET_RECOGNITION,
};

/// Dispatches canonical images to a shared [`TextRecognizer`].
#[derive(Clone)]
pub struct RecognitionAdapter {
    engine: Arc<dyn TextRecognizer>,
    timeout: Duration,
}

impl RecognitionAdapter {
    /// Default bound on a single recognition call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates an adapter over `engine` with the default timeout.
    pub fn new(engine: Arc<dyn TextRecognizer>) -> Self {
        Self {
            engine,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the bound on a single recognition call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the underlying engine.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Forwards a health check to the engine.
    pub async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        self.engine.health_check().await
    }

    /// Recognizes text in `image` using the first requested language.
    pub async fn recognize(
        &self,
        image: &CanonicalImage,
        options: &RecognitionOptions,
    ) -> Result<RecognitionResult, RecognitionError> {
        let language = options.language();
        if !is_valid_language(language) {
            return Err(RecognitionError::UnsupportedLanguage(language.to_owned()));
        }

        let mut request = EngineRequest::new(language);
        if options.is_accurate() {
            request = request.with_progress(log_progress(self.engine.name()));
        }

        tracing::debug!(
            target: TRACING_TARGET_RECOGNITION,
            engine = self.engine.name(),
            language = language,
            mode = ?options.mode,
            width = image.width(),
            height = image.height(),
            "dispatching image to engine"
        );

        let output = tokio::time::timeout(self.timeout, self.engine.recognize(image, &request))
            .await
            .map_err(|_| {
                tracing::warn!(
                    target: TRACING_TARGET_RECOGNITION,
                    engine = self.engine.name(),
                    timeout = ?self.timeout,
                    "recognition timed out"
                );
                RecognitionError::Timeout(self.timeout)
            })??;

        Ok(RecognitionResult {
            width: image.width(),
            height: image.height(),
            content: output.text,
            confidence: output.confidence,
        })
    }
}

impl std::fmt::Debug for RecognitionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionAdapter")
            .field("engine", &self.engine.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Language codes are short identifiers such as `eng` or `chi_sim`, possibly
/// combined with `+`.
fn is_valid_language(language: &str) -> bool {
    !language.is_empty()
        && language
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'+')
}

fn log_progress(engine: &str) -> ProgressReporter {
    let engine: Arc<str> = Arc::from(engine);
    ProgressReporter::new(move |event: ProgressEvent| {
        tracing::info!(
            target: TRACING_TARGET_PROGRESS,
            engine = %engine,
            status = %event.status,
            progress = ?event.progress,
            "recognition progress"
        );
    })
}
