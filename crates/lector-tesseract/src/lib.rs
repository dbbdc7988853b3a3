#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use lector_core::EngineError;

/// Logging target for process management.
pub const TESSERACT_TARGET: &str = "lector_tesseract::client";

/// Logging target for recognition calls.
pub const RECOGNIZER_TARGET: &str = "lector_tesseract::recognizer";

pub mod client;
pub mod tsv;

pub use client::{TsClient, TsConfig};

/// Result type for all Tesseract operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types for Tesseract operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The binary could not be started.
    #[error("Failed to start '{binary}': {source}")]
    Spawn {
        /// Configured binary path
        binary: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the process failed.
    #[error("Process I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tesseract has no trained data for the language.
    #[error("Language data not found: {language}")]
    MissingLanguage {
        /// Requested language code
        language: String,
    },

    /// Tesseract exited unsuccessfully.
    #[error("Tesseract exited with code {code:?}: {stderr}")]
    Exit {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The TSV output could not be parsed.
    #[error("Invalid TSV output: {message}")]
    InvalidOutput {
        /// Description of what's invalid
        message: String,
    },
}

impl Error {
    /// Create an invalid output error
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Spawn { .. } => "spawn",
            Error::Io(_) => "io",
            Error::MissingLanguage { .. } => "missing_language",
            Error::Exit { .. } => "exit",
            Error::InvalidOutput { .. } => "invalid_output",
        }
    }
}

impl From<Error> for EngineError {
    fn from(error: Error) -> Self {
        match error {
            Error::MissingLanguage { language } => EngineError::UnsupportedLanguage(language),
            error @ Error::Spawn { .. } => {
                EngineError::unavailable("tesseract binary unavailable").with_source(error)
            }
            error => EngineError::failure("tesseract failed").with_source(error),
        }
    }
}
