//! iterdns infrastructure: wire codec, record cache, UDP transport,
//! iterative resolver, zone file reader and datagram handling.
pub mod dns;
