use super::{RData, RecordClass, RecordType};
use crate::name::Name;
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,

    pub class: RecordClass,

    /// Seconds. Relative to "now" everywhere outside the cache internals.
    pub ttl: u32,

    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: Name, class: RecordClass, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            class,
            ttl,
            rdata,
        }
    }

    pub fn a(name: Name, ttl: u32, address: Ipv4Addr) -> Self {
        Self::new(name, RecordClass::IN, ttl, RData::A { address })
    }

    pub fn ns(name: Name, ttl: u32, nameserver: Name) -> Self {
        Self::new(name, RecordClass::IN, ttl, RData::NS { nameserver })
    }

    pub fn cname(name: Name, ttl: u32, alias: Name) -> Self {
        Self::new(name, RecordClass::IN, ttl, RData::CNAME { alias })
    }

    pub fn record_type(&self) -> RecordType {
        self.rdata.record_type()
    }

    /// Same (name, type, class, rdata); the TTL is not part of a record's
    /// identity.
    pub fn same_record_as(&self, other: &ResourceRecord) -> bool {
        self.name == other.name && self.class == other.class && self.rdata == other.rdata
    }

    pub fn matches(&self, name: &Name, record_type: RecordType, class: RecordClass) -> bool {
        self.record_type() == record_type && self.class == class && &self.name == name
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.ttl,
            self.class,
            self.record_type(),
            self.rdata
        )
    }
}
