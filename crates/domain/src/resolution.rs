use crate::dns_record::ResourceRecord;
use crate::name::Name;
use std::net::Ipv4Addr;

/// Result of resolving a host name to IPv4 addresses.
///
/// A failed resolution is a value, not an error: empty `aliases` and empty
/// `addresses`, with `canonical_name` left at the queried name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub canonical_name: Name,

    /// Names that were aliases on the way to `canonical_name`, in the order
    /// they were followed.
    pub aliases: Vec<Name>,

    pub addresses: Vec<Ipv4Addr>,

    /// CNAME chain followed by the A records, ready to be placed in an
    /// answer section.
    pub answers: Vec<ResourceRecord>,

    pub cache_hit: bool,
}

impl Resolution {
    pub fn failure(hostname: Name) -> Self {
        Self {
            canonical_name: hostname,
            aliases: Vec::new(),
            addresses: Vec::new(),
            answers: Vec::new(),
            cache_hit: false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.addresses.is_empty()
    }

    /// Every name visited, aliases first and the canonical name last.
    pub fn name_chain(&self) -> Vec<Name> {
        let mut chain = self.aliases.clone();
        chain.push(self.canonical_name.clone());
        chain
    }
}
