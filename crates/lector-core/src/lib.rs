#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Lector Core
//!
//! The pipeline is split into three stages that run in order for every image:
//! [`SourceResolver`] produces encoded bytes, [`ImageNormalizer`] turns them
//! into a [`CanonicalImage`], and [`RecognitionAdapter`] hands that image to a
//! [`TextRecognizer`]. [`RequestPipeline`] wraps the stages into a single
//! timed [`Outcome`], and [`BatchCoordinator`] fans a list of sources out
//! across the pipeline.

/// Tracing target for source resolution.
pub const TRACING_TARGET_SOURCE: &str = "lector_core::source";

/// Tracing target for image normalization.
pub const TRACING_TARGET_NORMALIZE: &str = "lector_core::normalize";

/// Tracing target for recognition dispatch.
pub const TRACING_TARGET_RECOGNITION: &str = "lector_core::recognition";

/// Tracing target for engine progress events.
pub const TRACING_TARGET_PROGRESS: &str = "lector_core::recognition::progress";

/// Tracing target for the request pipeline and batch coordinator.
pub const TRACING_TARGET_PIPELINE: &str = "lector_core::pipeline";

mod error;
mod health;

pub mod normalize;
pub mod pipeline;
pub mod recognition;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, EngineError, NormalizationError, PipelineError, RecognitionError};
pub use health::{ServiceHealth, ServiceStatus};
pub use normalize::{CanonicalImage, ImageNormalizer};
pub use pipeline::{BatchCoordinator, BatchEnvelope, Outcome, PipelineConfig, RequestPipeline};
pub use recognition::{
    EngineOutput, EngineRequest, ProgressEvent, ProgressReporter, RecognitionAdapter,
    RecognitionMode, RecognitionOptions, RecognitionResult, TextRecognizer,
};
pub use source::{AllowList, ImageSource, IntoImageSource, RawImageSource, SourceError, SourceResolver};
