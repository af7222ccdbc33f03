use crate::ExpirySweepJob;
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_expiry_sweep(ExpirySweepJob::new(sweep).with_cancellation(token))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    expiry_sweep: Option<ExpirySweepJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self { expiry_sweep: None }
    }

    pub fn with_expiry_sweep(mut self, job: ExpirySweepJob) -> Self {
        self.expiry_sweep = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.expiry_sweep {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
