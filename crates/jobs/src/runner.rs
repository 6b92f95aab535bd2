use crate::CacheSnapshotJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawns the configured background jobs, all sharing one shutdown token.
pub struct JobRunner {
    cache_snapshot: Option<CacheSnapshotJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            cache_snapshot: None,
            shutdown: None,
        }
    }

    pub fn with_cache_snapshot(mut self, job: CacheSnapshotJob) -> Self {
        self.cache_snapshot = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");
        let mut handles = Vec::new();

        if let Some(job) = self.cache_snapshot {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            let job = Arc::new(job);
            handles.push(tokio::spawn(async move { job.start().await }));
        }

        info!(jobs = handles.len(), "Background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
