use super::config::ResolverConfig;
use super::core::IterativeResolver;
use crate::dns::transport::{udp::UdpTransport, DnsTransport};
use iterdns_application::ports::RecordStore;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    transport: Arc<dyn DnsTransport>,
    config: ResolverConfig,
    cache: Option<Arc<dyn RecordStore>>,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new(Arc::new(UdpTransport::new()))
    }
}

impl ResolverBuilder {
    pub fn new(transport: Arc<dyn DnsTransport>) -> Self {
        Self {
            transport,
            config: ResolverConfig::default(),
            cache: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn RecordStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Arc<IterativeResolver> {
        info!(
            transport = self.transport.protocol_name(),
            root_servers = self.config.root_servers.len(),
            timeout_ms = self.config.query_timeout.as_millis() as u64,
            cache = self.cache.is_some(),
            "Building DNS resolver"
        );

        let resolver = IterativeResolver::new(self.transport, self.config);
        Arc::new(match self.cache {
            Some(cache) => resolver.with_cache(cache),
            None => resolver,
        })
    }
}
