mod cache_maintenance;
mod dns_resolver;
mod record_store;

pub use cache_maintenance::{CacheMaintenancePort, CacheSnapshotOutcome};
pub use dns_resolver::DnsResolver;
pub use record_store::RecordStore;
