//! Error types for every pipeline stage.
//!
//! The `Display` text of each error is the exact message reported to clients
//! in a failure outcome. Causes are kept as sources for logging only.

use std::time::Duration;

/// Type alias for boxed errors that are thread-safe.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while turning an image source into encoded bytes.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Zero or more than one of `url`, `base64` and `bytes` was supplied,
    /// or the source could not be parsed at all.
    #[error("Invalid image source")]
    InvalidSource,

    /// The `url` field is not an absolute `http` or `https` URL.
    #[error("Invalid URL")]
    InvalidUrl {
        /// What was wrong with the URL.
        reason: String,
    },

    /// The URL host, or a redirect target, is outside the allow-list.
    #[error("Domain not allowed")]
    DomainNotAllowed {
        /// The rejected host.
        host: String,
    },

    /// The remote server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: u16,
    },

    /// The fetch failed at the transport level or timed out.
    #[error("Failed to fetch image")]
    Fetch(#[source] reqwest::Error),

    /// The fetched body is larger than the configured limit.
    #[error("Image exceeds maximum size")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Failure while decoding or re-encoding an image.
///
/// Every variant reports the same client-facing message; the variant and
/// its source are logged.
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    /// The bytes could not be read as any supported format.
    #[error("Failed to process image")]
    Io(#[source] std::io::Error),

    /// The image could not be decoded or encoded.
    #[error("Failed to process image")]
    Codec(#[source] image::ImageError),

    /// Decoding reported a zero width or height.
    #[error("Failed to process image")]
    EmptyDimensions {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },

    /// A blocking decode task failed to complete.
    #[error("Failed to process image")]
    Task(#[source] tokio::task::JoinError),
}

/// Failure reported by a recognition engine backend.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine does not have data for the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The engine could not be reached or started.
    #[error("engine unavailable: {message}")]
    Unavailable {
        /// What made the engine unavailable.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedError>,
    },

    /// The engine ran but failed to produce a result.
    #[error("engine failure: {message}")]
    Failure {
        /// What went wrong.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedError>,
    },
}

impl EngineError {
    /// Creates an [`EngineError::Unavailable`] without a source.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an [`EngineError::Failure`] without a source.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_source(self, cause: impl Into<BoxedError>) -> Self {
        match self {
            Self::Unavailable { message, .. } => Self::Unavailable {
                message,
                source: Some(cause.into()),
            },
            Self::Failure { message, .. } => Self::Failure {
                message,
                source: Some(cause.into()),
            },
            other => other,
        }
    }
}

/// Failure while recognizing text in a canonical image.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// The requested language code is malformed or unknown to the engine.
    #[error("Unsupported language")]
    UnsupportedLanguage(String),

    /// The engine did not finish within the configured bound.
    #[error("Recognition timed out")]
    Timeout(Duration),

    /// The engine failed.
    #[error("Failed to recognize text")]
    Engine(#[source] EngineError),
}

impl From<EngineError> for RecognitionError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::UnsupportedLanguage(language) => Self::UnsupportedLanguage(language),
            other => Self::Engine(other),
        }
    }
}

/// Failure of any stage of the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source resolution failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Normalization failed.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Recognition failed.
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

impl PipelineError {
    /// Returns the name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::Normalization(_) => "normalize",
            Self::Recognition(_) => "recognize",
        }
    }
}
