use crate::ports::RecordStore;
use iterdns_domain::{Name, RData, RecordClass, RecordType, Resolution, ResourceRecord};
use tracing::debug;

/// What the cache alone knows about a host name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedChain {
    /// Address records were reached, possibly through aliases.
    Resolved(Resolution),
    /// Aliases were followed but `target` has no cached address.
    Partial {
        aliases: Vec<Name>,
        target: Name,
        records: Vec<ResourceRecord>,
    },
    Miss,
}

/// Follows cached CNAME records from `hostname` until cached A records are
/// found, at most `max_chain` aliases deep.
pub fn chase_cached(store: &dyn RecordStore, hostname: &Name, max_chain: usize) -> CachedChain {
    let mut aliases = Vec::new();
    let mut records = Vec::new();
    let mut current = hostname.clone();

    loop {
        let addresses = store.lookup(&current, RecordType::A, RecordClass::IN);
        if !addresses.is_empty() {
            debug!(
                domain = %hostname,
                canonical = %current,
                aliases = aliases.len(),
                "Cache HIT"
            );
            let resolution = Resolution {
                canonical_name: current,
                aliases,
                addresses: addresses.iter().filter_map(|r| r.rdata.address()).collect(),
                answers: records.into_iter().chain(addresses).collect(),
                cache_hit: true,
            };
            return CachedChain::Resolved(resolution);
        }

        if aliases.len() >= max_chain {
            break;
        }

        let alias = store
            .lookup(&current, RecordType::CNAME, RecordClass::IN)
            .into_iter()
            .next();
        let Some(record) = alias else {
            break;
        };
        let RData::CNAME { alias: target } = &record.rdata else {
            break;
        };
        let target = target.clone();

        aliases.push(std::mem::replace(&mut current, target));
        records.push(record);
    }

    if aliases.is_empty() {
        CachedChain::Miss
    } else {
        CachedChain::Partial {
            aliases,
            target: current,
            records,
        }
    }
}
