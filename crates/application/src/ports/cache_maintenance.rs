use async_trait::async_trait;
use iterdns_domain::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSnapshotOutcome {
    pub purged: usize,
    pub saved: usize,
}

/// Periodic housekeeping of a persistent record cache.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Drops expired records, then writes the rest to the snapshot file.
    async fn run_snapshot_cycle(&self) -> Result<CacheSnapshotOutcome, DomainError>;
}
