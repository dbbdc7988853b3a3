#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::time::Duration;

use lector_core::EngineError;

/// Logging target for PaddleX client operations.
pub const PADDLEX_TARGET: &str = "lector_paddle::client";

/// Logging target for recognition calls.
pub const RECOGNIZER_TARGET: &str = "lector_paddle::recognizer";

pub mod client;

pub use client::{PdClient, PdConfig};

/// Result type for all PaddleX operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types for PaddleX operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client errors (connection, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The pipeline answered with an error code.
    #[error("API error (status {status}, code {code}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// PaddleX `errorCode`
        code: i64,
        /// PaddleX `errorMsg`
        message: String,
    },

    /// Invalid or malformed API response
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of what's invalid
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {timeout:?}")]
    Timeout {
        /// Duration before timeout occurred
        timeout: Duration,
    },

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Service unavailable
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Description of the unavailability
        message: String,
    },
}

impl Error {
    /// Create an API error
    pub fn api(status: u16, code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Check if this error indicates a temporary failure that might succeed on retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::RateLimit | Error::ServiceUnavailable { .. } => true,
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Api { status, .. } => matches!(*status, 429 | 500..=599),
            Error::InvalidResponse { .. } | Error::Config { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Api { .. } => "api",
            Error::InvalidResponse { .. } => "invalid_response",
            Error::Config { .. } => "config",
            Error::Timeout { .. } => "timeout",
            Error::RateLimit => "rate_limit",
            Error::ServiceUnavailable { .. } => "service_unavailable",
        }
    }
}

impl From<Error> for EngineError {
    fn from(error: Error) -> Self {
        let unavailable = match &error {
            Error::Http(err) => err.is_connect(),
            Error::ServiceUnavailable { .. } | Error::RateLimit | Error::Timeout { .. } => true,
            _ => false,
        };

        if unavailable {
            EngineError::unavailable("PaddleX pipeline unavailable").with_source(error)
        } else {
            EngineError::failure("PaddleX pipeline failed").with_source(error)
        }
    }
}
