use iterdns_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 300;

/// Purges expired cache entries and writes the snapshot file on a fixed
/// interval. The first cycle runs one interval after start.
pub struct CacheSnapshotJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheSnapshotJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            interval_secs: DEFAULT_SNAPSHOT_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting cache snapshot job"
        );

        let period = Duration::from_secs(self.interval_secs);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("CacheSnapshotJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.maintenance.run_snapshot_cycle().await {
                        Ok(outcome) => {
                            debug!(
                                purged = outcome.purged,
                                saved = outcome.saved,
                                "Cache snapshot cycle completed"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "Cache snapshot cycle failed");
                        }
                    }
                }
            }
        }
    }
}
