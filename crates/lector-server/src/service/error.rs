use std::borrow::Cow;

use lector_core::BoxedError;

/// Result type alias for service setup.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Errors raised while validating configuration or building [`ServiceState`].
///
/// [`ServiceState`]: crate::service::ServiceState
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(Cow<'static, str>),

    /// The pipeline could not be assembled.
    #[error("failed to build the recognition pipeline")]
    Pipeline(#[source] BoxedError),
}

impl ServiceError {
    /// Creates a [`ServiceError::Config`].
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a [`ServiceError::Pipeline`] from any error.
    pub fn pipeline(source: impl Into<BoxedError>) -> Self {
        Self::Pipeline(source.into())
    }
}
