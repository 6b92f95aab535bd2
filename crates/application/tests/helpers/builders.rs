use iterdns_domain::{Message, Name, Question, RecordClass, RecordType, ResourceRecord};
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

pub fn query(domain: &str, qtype: RecordType, rd: bool) -> Message {
    Message::query(
        0x1234,
        Question::new(name(domain), qtype, RecordClass::IN),
        rd,
    )
}
