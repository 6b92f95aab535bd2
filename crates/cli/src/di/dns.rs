use iterdns_application::ports::RecordStore;
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::{Config, Zone};
use iterdns_infrastructure::dns::{
    load_zone, IterativeResolver, RecordCache, ResolverBuilder, ResolverConfig,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub resolver: Arc<IterativeResolver>,
    pub cache: Option<Arc<RecordCache>>,
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let cache = Self::build_cache(config);
        let zone = Arc::new(Self::load_zone(config)?);

        let mut builder = ResolverBuilder::default().with_config(ResolverConfig::from(&config.dns));
        if let Some(cache) = &cache {
            builder = builder.with_cache(cache.clone() as Arc<dyn RecordStore>);
        }
        let resolver = builder.build();

        let mut use_case = HandleDnsQueryUseCase::new(zone, resolver.clone())
            .with_max_cname_chain(config.dns.max_cname_chain);
        if let Some(cache) = &cache {
            use_case = use_case.with_cache(cache.clone());
        }

        info!(
            cache_enabled = cache.is_some(),
            root_servers = config.dns.root_servers.len(),
            "DNS services initialized"
        );

        Ok(Self {
            resolver,
            cache,
            handler_use_case: Arc::new(use_case),
        })
    }

    fn build_cache(config: &Config) -> Option<Arc<RecordCache>> {
        if !config.cache.enabled {
            info!("Record cache disabled");
            return None;
        }

        let mut cache = RecordCache::new().with_ttl_override(config.cache.ttl_override);
        if let Some(path) = &config.cache.snapshot_path {
            cache = cache.with_snapshot_path(path);
        }
        cache.load_snapshot();

        info!(
            ttl_override = config.cache.ttl_override,
            snapshot = ?config.cache.snapshot_path,
            records = cache.len(),
            "Record cache enabled"
        );
        Some(Arc::new(cache))
    }

    fn load_zone(config: &Config) -> anyhow::Result<Zone> {
        match &config.zone.path {
            Some(path) => Ok(load_zone(Path::new(path))?),
            None => {
                info!("No zone file configured, serving cache and recursion only");
                Ok(Zone::new())
            }
        }
    }
}
