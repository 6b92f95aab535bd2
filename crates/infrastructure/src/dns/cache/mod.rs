pub mod clock;
pub mod record;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::CachedRecord;

use async_trait::async_trait;
use iterdns_application::ports::{CacheMaintenancePort, CacheSnapshotOutcome, RecordStore};
use iterdns_domain::{DomainError, Name, RecordClass, RecordType, ResourceRecord};
use snapshot::{SnapshotFile, SnapshotRecord, SNAPSHOT_VERSION};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Expiring store of resource records shared by concurrent resolutions.
///
/// Every check-and-mutate sequence runs under one mutex, so a reader never
/// observes an entry that is being replaced.
pub struct RecordCache {
    entries: Mutex<Vec<CachedRecord>>,
    clock: Arc<dyn Clock>,
    ttl_override: u32,
    snapshot_path: Option<PathBuf>,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock: Arc::new(SystemClock),
            ttl_override: 0,
            snapshot_path: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// A non-zero override replaces the TTL of every record added afterwards.
    pub fn with_ttl_override(mut self, ttl_override: u32) -> Self {
        self.ttl_override = ttl_override;
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Live records for (name, type, class) with their remaining TTL.
    /// Expired entries for every key are dropped on the way.
    pub fn lookup(
        &self,
        name: &Name,
        record_type: RecordType,
        class: RecordClass,
    ) -> Vec<ResourceRecord> {
        let now = self.clock.now_millis();
        let mut entries = self.entries();
        let purged = Self::retain_live(&mut entries, now);
        if purged > 0 {
            debug!(purged = purged, "Purged expired cache entries");
        }

        entries
            .iter()
            .filter(|entry| entry.record.matches(name, record_type, class))
            .map(|entry| entry.to_record(now))
            .collect()
    }

    pub fn add_record(&self, record: ResourceRecord) {
        let now = self.clock.now_millis();
        let ttl = if self.ttl_override > 0 {
            self.ttl_override
        } else {
            record.ttl
        };
        let entry = CachedRecord::new(record, now, ttl);

        let mut entries = self.entries();
        match entries
            .iter()
            .position(|existing| existing.record.same_record_as(&entry.record))
        {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
    }

    /// Drops every expired entry, returning how many went.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_millis();
        Self::retain_live(&mut self.entries(), now)
    }

    /// Replaces the contents with the snapshot at `path`.
    ///
    /// A missing or unreadable snapshot leaves the cache empty; records that
    /// expired while the process was down are skipped. Returns how many
    /// records were loaded.
    pub fn load(&self, path: &Path) -> usize {
        let now = self.clock.now_millis();
        let loaded: Vec<CachedRecord> = match read_snapshot(path) {
            Ok(file) => file
                .records
                .into_iter()
                .filter_map(|value| match decode_record(value) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable cache snapshot record");
                        None
                    }
                })
                .filter(|entry| !entry.is_expired(now))
                .collect(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read cache snapshot");
                Vec::new()
            }
        };

        let count = loaded.len();
        *self.entries() = loaded;
        info!(path = %path.display(), records = count, "Cache snapshot loaded");
        count
    }

    /// Writes the live records to `path` through a temporary sibling file.
    pub fn save(&self, path: &Path) -> Result<usize, DomainError> {
        let now = self.clock.now_millis();
        let records: Vec<SnapshotRecord> = self
            .entries()
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .map(SnapshotRecord::from)
            .collect();
        let count = records.len();

        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            saved_at_millis: now,
            records,
        };

        match write_snapshot(path, &file) {
            Ok(()) => {
                debug!(path = %path.display(), records = count, "Cache snapshot saved");
                Ok(count)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to save cache snapshot");
                Err(e)
            }
        }
    }

    /// Loads from the configured snapshot path, if any.
    pub fn load_snapshot(&self) -> usize {
        match &self.snapshot_path {
            Some(path) => self.load(path),
            None => 0,
        }
    }

    /// Saves to the configured snapshot path, if any.
    pub fn save_snapshot(&self) -> Result<usize, DomainError> {
        match &self.snapshot_path {
            Some(path) => self.save(path),
            None => Ok(0),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<CachedRecord>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Partitions into live and expired, keeps the live half.
    fn retain_live(entries: &mut Vec<CachedRecord>, now_millis: u64) -> usize {
        let (live, expired): (Vec<_>, Vec<_>) = std::mem::take(entries)
            .into_iter()
            .partition(|entry| !entry.is_expired(now_millis));
        *entries = live;
        expired.len()
    }
}

impl RecordStore for RecordCache {
    fn lookup(
        &self,
        name: &Name,
        record_type: RecordType,
        class: RecordClass,
    ) -> Vec<ResourceRecord> {
        RecordCache::lookup(self, name, record_type, class)
    }

    fn add_record(&self, record: ResourceRecord) {
        RecordCache::add_record(self, record)
    }
}

#[async_trait]
impl CacheMaintenancePort for RecordCache {
    async fn run_snapshot_cycle(&self) -> Result<CacheSnapshotOutcome, DomainError> {
        let purged = self.purge_expired();
        let saved = self.save_snapshot()?;
        Ok(CacheSnapshotOutcome { purged, saved })
    }
}

fn read_snapshot(path: &Path) -> Result<SnapshotFile<serde_json::Value>, DomainError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| DomainError::CacheIo(e.to_string()))?;
    let file: SnapshotFile<serde_json::Value> =
        serde_json::from_str(&contents).map_err(|e| DomainError::CacheIo(e.to_string()))?;
    if file.version != SNAPSHOT_VERSION {
        return Err(DomainError::CacheIo(format!(
            "unsupported snapshot version {}",
            file.version
        )));
    }
    Ok(file)
}

fn decode_record(value: serde_json::Value) -> Result<CachedRecord, String> {
    let record: SnapshotRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
    CachedRecord::try_from(record)
}

fn write_snapshot(path: &Path, file: &SnapshotFile) -> Result<(), DomainError> {
    let json = serde_json::to_vec_pretty(file).map_err(|e| DomainError::CacheIo(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| DomainError::CacheIo(format!("{}: {}", dir.display(), e)))?;
    temp.write_all(&json)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| DomainError::CacheIo(e.to_string()))?;
    temp.persist(path)
        .map_err(|e| DomainError::CacheIo(format!("{}: {}", path.display(), e.error)))?;
    Ok(())
}
