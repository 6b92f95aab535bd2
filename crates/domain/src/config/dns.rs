use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Root hint addresses the iterative walk starts from.
    #[serde(default = "default_root_servers")]
    pub root_servers: Vec<Ipv4Addr>,

    /// Port used when querying upstream name servers.
    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Per-attempt timeout, milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_max_referral_hops")]
    pub max_referral_hops: usize,

    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,

    #[serde(default = "default_max_cname_chain")]
    pub max_cname_chain: usize,
}

impl DnsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            root_servers: default_root_servers(),
            upstream_port: default_upstream_port(),
            query_timeout_ms: default_query_timeout(),
            max_referral_hops: default_max_referral_hops(),
            max_recursion_depth: default_max_recursion_depth(),
            max_cname_chain: default_max_cname_chain(),
        }
    }
}

fn default_root_servers() -> Vec<Ipv4Addr> {
    // a.root-servers.net
    vec![Ipv4Addr::new(198, 41, 0, 4)]
}

fn default_upstream_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    5000
}

fn default_max_referral_hops() -> usize {
    32
}

fn default_max_recursion_depth() -> usize {
    4
}

fn default_max_cname_chain() -> usize {
    8
}
