//! In-process mock recognition engine for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! lector-core = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{
    CanonicalImage, EngineError, EngineOutput, EngineRequest, ProgressEvent, ServiceHealth,
    TextRecognizer,
};

/// Behaviour of a [`MockRecognizer`].
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Text returned for every image.
    pub text: String,
    /// Confidence returned for every image.
    pub confidence: f64,
    /// Artificial delay before answering.
    pub delay: Option<Duration>,
    /// Fail every recognition call.
    pub fail: bool,
    /// Report unhealthy from health checks.
    pub unhealthy: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            confidence: 95.0,
            delay: None,
            fail: false,
            unhealthy: false,
        }
    }
}

/// A [`TextRecognizer`] that returns canned results.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    config: MockConfig,
    calls: Arc<AtomicUsize>,
}

impl MockRecognizer {
    /// Creates a mock engine with the given behaviour.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            calls: Arc::default(),
        }
    }

    /// Creates a mock engine that returns `text` for every image.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(MockConfig {
            text: text.into(),
            ..Default::default()
        })
    }

    /// Number of recognition calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TextRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(
        &self,
        _image: &CanonicalImage,
        request: &EngineRequest,
    ) -> Result<EngineOutput, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        request.report(ProgressEvent::new("recognizing text").with_progress(0.0));

        if let Some(delay) = self.config.delay {
            tokio::time::sleep(delay).await;
        }

        if self.config.fail {
            return Err(EngineError::failure("mock engine configured to fail"));
        }

        request.report(ProgressEvent::new("recognizing text").with_progress(1.0));
        Ok(EngineOutput::new(self.config.text.clone(), self.config.confidence))
    }

    async fn health_check(&self) -> Result<ServiceHealth, EngineError> {
        if self.config.unhealthy {
            return Ok(ServiceHealth::unhealthy("mock engine configured unhealthy"));
        }
        Ok(ServiceHealth::healthy())
    }
}
