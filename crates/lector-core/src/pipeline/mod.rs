//! Single-image pipeline and batch coordination.

mod batch;
mod outcome;
mod request;

use std::time::{Duration, Instant};

pub use self::batch::BatchCoordinator;
pub use self::outcome::{BatchEnvelope, Outcome};
pub use self::request::RequestPipeline;
use crate::source::SourceConfig;
use crate::{AllowList, RecognitionAdapter};

/// Settings for building a [`RequestPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hosts that remote images may be fetched from.
    pub allowed_domains: Vec<String>,
    /// Upper bound on a single remote fetch.
    pub fetch_timeout: Duration,
    /// Upper bound on a single recognition call.
    pub recognition_timeout: Duration,
    /// Largest accepted remote image in bytes.
    pub max_image_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let source = SourceConfig::default();
        Self {
            allowed_domains: vec![AllowList::DEFAULT_HOST.to_owned()],
            fetch_timeout: source.fetch_timeout,
            recognition_timeout: RecognitionAdapter::DEFAULT_TIMEOUT,
            max_image_size: source.max_image_size,
        }
    }
}

impl PipelineConfig {
    /// Returns the source resolver settings.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            allow_list: AllowList::new(&self.allowed_domains),
            fetch_timeout: self.fetch_timeout,
            max_image_size: self.max_image_size,
            ..SourceConfig::default()
        }
    }
}

/// Milliseconds since `start`, rounded to the nearest integer.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    (start.elapsed().as_secs_f64() * 1000.0).round() as u64
}
