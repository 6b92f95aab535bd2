use iterdns_domain::{Name, RecordClass, RecordType, ResourceRecord};

/// Expiring record storage shared by the resolver and the query handler.
pub trait RecordStore: Send + Sync {
    /// Live records matching exactly, TTL reported as seconds remaining.
    fn lookup(&self, name: &Name, record_type: RecordType, class: RecordClass)
        -> Vec<ResourceRecord>;

    /// Inserts or refreshes a record; an equal record (TTL aside) is replaced.
    fn add_record(&self, record: ResourceRecord);
}
