use async_trait::async_trait;
use iterdns_application::ports::{CacheMaintenancePort, CacheSnapshotOutcome};
use iterdns_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub struct MockCacheMaintenancePort {
    cycle_count: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            cycle_count: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::Relaxed)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_snapshot_cycle(&self) -> Result<CacheSnapshotOutcome, DomainError> {
        self.cycle_count.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::CacheIo("mock snapshot failure".into()));
        }
        Ok(CacheSnapshotOutcome {
            purged: 1,
            saved: 10,
        })
    }
}
