use iterdns_domain::ResourceRecord;

/// A record as stored in the cache: its TTL is replaced by an absolute
/// expiry in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRecord {
    pub record: ResourceRecord,
    pub expires_at_millis: u64,
}

impl CachedRecord {
    pub fn new(record: ResourceRecord, now_millis: u64, ttl: u32) -> Self {
        Self {
            record,
            expires_at_millis: now_millis + ttl as u64 * 1000,
        }
    }

    #[inline]
    pub fn is_expired(&self, now_millis: u64) -> bool {
        now_millis >= self.expires_at_millis
    }

    /// Whole seconds left, rounded up so a live record never reports zero.
    pub fn remaining_ttl(&self, now_millis: u64) -> u32 {
        self.expires_at_millis
            .saturating_sub(now_millis)
            .div_ceil(1000)
            .min(u32::MAX as u64) as u32
    }

    /// Copy of the record carrying the seconds left as its TTL.
    pub fn to_record(&self, now_millis: u64) -> ResourceRecord {
        self.record.clone().with_ttl(self.remaining_ttl(now_millis))
    }
}
