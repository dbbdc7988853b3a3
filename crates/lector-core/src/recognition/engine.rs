//! The recognition engine port.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::{CanonicalImage, EngineError, ServiceHealth};

/// A progress update emitted by an engine while it works.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// What the engine is doing.
    pub status: String,
    /// Fraction complete in `0.0..=1.0`, when the engine knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

impl ProgressEvent {
    /// Creates an event with a status and no progress fraction.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            progress: None,
        }
    }

    /// Sets the progress fraction, clamped to `0.0..=1.0`.
    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress.clamp(0.0, 1.0));
        self
    }
}

/// Sink for [`ProgressEvent`]s.
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<dyn Fn(ProgressEvent) + Send + Sync>,
}

impl ProgressReporter {
    /// Creates a reporter that forwards every event to `sink`.
    pub fn new(sink: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Forwards an event.
    pub fn report(&self, event: ProgressEvent) {
        (self.sink)(event);
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter").finish_non_exhaustive()
    }
}

/// A single recognition call.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    language: String,
    progress: Option<ProgressReporter>,
}

impl EngineRequest {
    /// Creates a request for `language` without progress reporting.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            progress: None,
        }
    }

    /// Attaches a progress reporter.
    pub fn with_progress(mut self, reporter: ProgressReporter) -> Self {
        self.progress = Some(reporter);
        self
    }

    /// Language code the engine should use.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns `true` if a progress reporter is attached.
    pub fn reports_progress(&self) -> bool {
        self.progress.is_some()
    }

    /// Forwards an event to the reporter, if any.
    pub fn report(&self, event: ProgressEvent) {
        if let Some(reporter) = &self.progress {
            reporter.report(event);
        }
    }
}

/// What an engine returns for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    /// Recognized text; may be empty.
    pub text: String,
    /// Confidence on a 0 to 100 scale.
    pub confidence: f64,
}

impl EngineOutput {
    /// Creates an output, clamping confidence to `0.0..=100.0`.
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A text-recognition engine.
///
/// Implementations must be safe to call concurrently; the pipeline shares
/// one instance across every request.
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Short engine identifier used in logs and health responses.
    fn name(&self) -> &str;

    /// Recognizes text in `image`.
    async fn recognize(
        &self,
        image: &CanonicalImage,
        request: &EngineRequest,
    ) -> Result<EngineOutput, EngineError>;

    /// Reports whether the engine can serve requests.
    async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn request_forwards_events_when_reporting() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let request = EngineRequest::new("eng")
            .with_progress(ProgressReporter::new(move |e| sink.lock().unwrap().push(e)));

        request.report(ProgressEvent::new("recognizing text").with_progress(2.0));

        assert!(request.reports_progress());
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].progress, Some(1.0));
    }

    #[test]
    fn request_without_reporter_drops_events() {
        let request = EngineRequest::new("eng");
        request.report(ProgressEvent::new("ignored"));
        assert!(!request.reports_progress());
    }

    #[test]
    fn output_confidence_is_clamped() {
        assert_eq!(EngineOutput::new("", 120.0).confidence, 100.0);
        assert_eq!(EngineOutput::new("", f64::NAN).confidence, 0.0);
    }
}
