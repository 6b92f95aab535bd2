use iterdns_domain::{Name, RecordClass, ResourceRecord};
use std::net::Ipv4Addr;

pub fn name(s: &str) -> Name {
    s.parse().unwrap()
}

pub fn a(owner: &str, ttl: u32, address: &str) -> ResourceRecord {
    ResourceRecord::a(name(owner), ttl, address.parse::<Ipv4Addr>().unwrap())
}

pub fn ns(owner: &str, ttl: u32, nameserver: &str) -> ResourceRecord {
    ResourceRecord::ns(name(owner), ttl, name(nameserver))
}

pub fn cname(owner: &str, ttl: u32, alias: &str) -> ResourceRecord {
    ResourceRecord::cname(name(owner), ttl, name(alias))
}

pub struct ZoneBuilder {
    records: Vec<ResourceRecord>,
}

impl ZoneBuilder {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn a(mut self, owner: &str, address: &str) -> Self {
        self.records.push(a(owner, 3600, address));
        self
    }

    pub fn ns(mut self, owner: &str, nameserver: &str) -> Self {
        self.records.push(ns(owner, 3600, nameserver));
        self
    }

    pub fn cname(mut self, owner: &str, alias: &str) -> Self {
        self.records.push(cname(owner, 3600, alias));
        self
    }

    pub fn chaos_a(mut self, owner: &str, address: &str) -> Self {
        let mut record = a(owner, 3600, address);
        record.class = RecordClass::CH;
        self.records.push(record);
        self
    }

    pub fn build(self) -> iterdns_domain::Zone {
        iterdns_domain::Zone::from_records(self.records)
    }
}
