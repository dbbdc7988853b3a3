//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Body limits ([`RouterBodyLimitExt`])
//! - Observability: request ids and tracing spans ([`RouterObservabilityExt`])
//! - Recovery from panics and timeouts ([`RouterRecoveryExt`])
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use lector_server::middleware::{MiddlewareConfig, RouterMiddlewareExt};
//!
//! let app: Router = Router::new().with_middleware(&MiddlewareConfig::default());
//! ```

mod body_limit;
mod observability;
mod recovery;

use std::time::Duration;

use axum::Router;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::{Result, ServiceError};

pub use crate::middleware::body_limit::{DEFAULT_MAX_BODY_SIZE, RouterBodyLimitExt};
pub use crate::middleware::observability::RouterObservabilityExt;
pub use crate::middleware::recovery::{DEFAULT_REQUEST_TIMEOUT, RouterRecoveryExt};

/// Configuration for the middleware stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct MiddlewareConfig {
    /// Maximum duration in seconds to wait for a request to complete before
    /// answering with a 503 failure envelope.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT)
    )]
    pub request_timeout: u64,

    /// Maximum accepted request body size in bytes.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)
    )]
    pub max_body_size: usize,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl MiddlewareConfig {
    /// Sets the whole-request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout = secs;
        self
    }

    /// Sets the maximum request body size in bytes.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Rejects zero timeouts and zero body limits.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(ServiceError::config("request timeout must be greater than zero"));
        }
        if self.max_body_size == 0 {
            return Err(ServiceError::config("max body size must be greater than zero"));
        }
        Ok(())
    }
}

/// Extension trait applying the full middleware stack in the right order.
pub trait RouterMiddlewareExt<S> {
    /// Layers body limits, recovery and observability.
    ///
    /// Observability is outermost so rejected and timed-out requests still
    /// carry a request id and a trace span.
    fn with_middleware(self, config: &MiddlewareConfig) -> Self;
}

impl<S> RouterMiddlewareExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_middleware(self, config: &MiddlewareConfig) -> Self {
        self.with_body_limit(config.max_body_size)
            .with_recovery(config.request_timeout())
            .with_observability()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MiddlewareConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
        assert_eq!(config.max_body_size, 24 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        assert!(MiddlewareConfig::default().with_timeout_secs(0).validate().is_err());
        assert!(MiddlewareConfig::default().with_max_body_size(0).validate().is_err());
    }
}
