use iterdns_domain::config::DnsConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Where every walk without cached delegations starts.
    pub root_servers: Vec<Ipv4Addr>,

    /// Port used for every upstream server, roots and glue alike.
    pub upstream_port: u16,

    pub query_timeout: Duration,

    /// Upstream queries one resolution may send, nested name server
    /// lookups and alias hops included.
    pub max_referral_hops: usize,

    /// Nested resolutions of glue-less name server names.
    pub max_recursion_depth: usize,

    /// Aliases followed for one resolution.
    pub max_cname_chain: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&DnsConfig::default())
    }
}

impl From<&DnsConfig> for ResolverConfig {
    fn from(config: &DnsConfig) -> Self {
        Self {
            root_servers: config.root_servers.clone(),
            upstream_port: config.upstream_port,
            query_timeout: config.query_timeout(),
            max_referral_hops: config.max_referral_hops,
            max_recursion_depth: config.max_recursion_depth,
            max_cname_chain: config.max_cname_chain,
        }
    }
}

impl ResolverConfig {
    pub fn with_root_servers(mut self, root_servers: Vec<Ipv4Addr>) -> Self {
        self.root_servers = root_servers;
        self
    }

    pub fn with_upstream_port(mut self, port: u16) -> Self {
        self.upstream_port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn upstream(&self, address: Ipv4Addr) -> SocketAddr {
        SocketAddr::new(address.into(), self.upstream_port)
    }

    pub fn root_candidates(&self) -> Vec<SocketAddr> {
        self.root_servers
            .iter()
            .map(|address| self.upstream(*address))
            .collect()
    }
}
