use async_trait::async_trait;
use iterdns_application::ports::{DnsResolver, RecordStore};
use iterdns_domain::{Name, RecordClass, RecordType, Resolution, ResourceRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockDnsResolver {
    responses: Arc<Mutex<HashMap<Name, Resolution>>>,
    calls: Arc<AtomicUsize>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, hostname: &Name, resolution: Resolution) {
        self.responses
            .lock()
            .unwrap()
            .insert(hostname.clone(), resolution);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, hostname: &Name) -> Resolution {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(hostname)
            .cloned()
            .unwrap_or_else(|| Resolution::failure(hostname.clone()))
    }
}

/// Record store without expiry, for use case tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<ResourceRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ResourceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn lookup(
        &self,
        name: &Name,
        record_type: RecordType,
        class: RecordClass,
    ) -> Vec<ResourceRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.matches(name, record_type, class))
            .cloned()
            .collect()
    }

    fn add_record(&self, record: ResourceRecord) {
        let mut records = self.records.lock().unwrap();
        match records.iter().position(|r| r.same_record_as(&record)) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
    }
}
