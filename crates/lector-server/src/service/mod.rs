//! Application state and dependency injection.

mod config;
mod error;

use std::sync::Arc;

use lector_core::{BatchCoordinator, RequestPipeline, TextRecognizer};

pub use crate::service::config::ServiceConfig;
pub use crate::service::error::{Result, ServiceError};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pipeline: Arc<RequestPipeline>,
    batch: BatchCoordinator,
}

impl ServiceState {
    /// Builds the pipeline over `engine` from configuration.
    pub fn from_config(config: &ServiceConfig, engine: Arc<dyn TextRecognizer>) -> Result<Self> {
        config.validate()?;

        let pipeline = RequestPipeline::from_config(&config.pipeline_config(), engine)
            .map_err(ServiceError::pipeline)?;

        Ok(Self::new(pipeline))
    }

    /// Wraps an already assembled pipeline.
    pub fn new(pipeline: RequestPipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        let batch = BatchCoordinator::new(Arc::clone(&pipeline));
        Self { pipeline, batch }
    }

    /// Name of the active recognition engine.
    pub fn engine_name(&self) -> &str {
        self.pipeline.engine_name()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pipeline: Arc<RequestPipeline>);
impl_di!(batch: BatchCoordinator);
