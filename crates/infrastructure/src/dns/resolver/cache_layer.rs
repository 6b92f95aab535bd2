use iterdns_application::ports::RecordStore;
use iterdns_domain::{Message, Name, RecordClass, RecordType};
use std::net::Ipv4Addr;
use tracing::debug;

/// Addresses of the closest cached name servers for `name`.
///
/// Walks from the full name towards the root and stops at the first suffix
/// whose NS records have cached addresses.
pub fn cached_nameservers(cache: &dyn RecordStore, name: &Name) -> Vec<Ipv4Addr> {
    for zone in name.suffixes() {
        let nameservers = cache.lookup(&zone, RecordType::NS, RecordClass::IN);
        if nameservers.is_empty() {
            continue;
        }

        let addresses: Vec<Ipv4Addr> = nameservers
            .iter()
            .filter_map(|ns| ns.rdata.target())
            .flat_map(|host| cache.lookup(host, RecordType::A, RecordClass::IN))
            .filter_map(|record| record.rdata.address())
            .collect();

        if !addresses.is_empty() {
            debug!(
                domain = %name,
                zone = %zone,
                servers = addresses.len(),
                "Starting from cached delegation"
            );
            return addresses;
        }
    }
    Vec::new()
}

/// Inserts every record of an upstream response.
pub fn store_response(cache: &dyn RecordStore, response: &Message) {
    for record in response.all_records() {
        cache.add_record(record.clone());
    }
}
