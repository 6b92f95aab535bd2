use iterdns_domain::{Name, ResourceRecord};
use std::net::{Ipv4Addr, SocketAddr};

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

pub fn ip(address: &str) -> Ipv4Addr {
    address.parse().unwrap()
}

/// Upstream address as the resolver builds it with the default port.
pub fn upstream(address: &str) -> SocketAddr {
    SocketAddr::new(ip(address).into(), 53)
}
