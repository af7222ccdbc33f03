use ferrous_doh_application::use_cases::SweepExpiredEntriesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically removes expired cache entries and idle pending keys.
pub struct ExpirySweepJob {
    sweep: Arc<SweepExpiredEntriesUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl ExpirySweepJob {
    pub fn new(sweep: Arc<SweepExpiredEntriesUseCase>) -> Self {
        Self {
            sweep,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            stores = self.sweep.store_count(),
            "Starting expiry sweep job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("ExpirySweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.sweep.execute();
                        if removed > 0 {
                            info!(removed, "Expiry sweep completed");
                        } else {
                            debug!("Expiry sweep found nothing to remove");
                        }
                    }
                }
            }
        });
    }
}
