use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use super::elapsed_ms;
use crate::{
    BatchEnvelope, IntoImageSource, NormalizationError, Outcome, RecognitionOptions,
    RequestPipeline, TRACING_TARGET_PIPELINE,
};

/// Runs the pipeline for many images concurrently.
///
/// Every source runs on its own task with no concurrency cap. One source
/// failing, or even panicking, does not affect the others, and outcomes
/// come back in input order.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    pipeline: Arc<RequestPipeline>,
}

impl BatchCoordinator {
    /// Creates a coordinator sharing `pipeline`.
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Runs every source with the same options.
    pub async fn run_batch<S>(&self, sources: Vec<S>, options: RecognitionOptions) -> BatchEnvelope
    where
        S: IntoImageSource,
    {
        let start = Instant::now();
        let options = Arc::new(options);
        let count = sources.len();

        tracing::debug!(
            target: TRACING_TARGET_PIPELINE,
            count = count,
            "starting batch"
        );

        let (started, tasks): (Vec<_>, Vec<_>) = sources
            .into_iter()
            .map(|source| {
                let pipeline = Arc::clone(&self.pipeline);
                let options = Arc::clone(&options);
                let task = tokio::spawn(async move { pipeline.run(source, &options).await });
                (Instant::now(), task)
            })
            .unzip();

        let outcomes: Vec<Outcome> = join_all(tasks)
            .await
            .into_iter()
            .zip(started)
            .enumerate()
            .map(|(index, (joined, started))| {
                let outcome = joined.unwrap_or_else(|error| {
                    tracing::error!(
                        target: TRACING_TARGET_PIPELINE,
                        index = index,
                        panicked = error.is_panic(),
                        error = %error,
                        "batch item task failed"
                    );
                    Outcome::failure(
                        NormalizationError::Task(error).to_string(),
                        elapsed_ms(started),
                    )
                });

                tracing::debug!(
                    target: TRACING_TARGET_PIPELINE,
                    index = index,
                    success = outcome.is_success(),
                    processing_time_ms = outcome.processing_time_ms(),
                    "batch item finished"
                );

                outcome
            })
            .collect();

        let total_processing_time_ms = elapsed_ms(start);
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();

        tracing::info!(
            target: TRACING_TARGET_PIPELINE,
            count = count,
            failed = failed,
            total_processing_time_ms = total_processing_time_ms,
            "batch finished"
        );

        BatchEnvelope {
            outcomes,
            total_processing_time_ms,
        }
    }
}
