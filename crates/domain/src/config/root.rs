use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::zone::ZoneConfig;

const DEFAULT_CONFIG_FILE: &str = "iterdns.toml";

/// Main configuration structure for iterdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Iterative resolution configuration
    #[serde(default)]
    pub dns: DnsConfig,

    /// Record cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Locally authoritative data
    #[serde(default)]
    pub zone: ZoneConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. iterdns.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&contents)
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(zone) = overrides.zone_path {
            self.zone.path = Some(zone);
        }
        if let Some(snapshot) = overrides.cache_path {
            self.cache.snapshot_path = Some(snapshot);
        }
        if overrides.disable_cache {
            self.cache.enabled = false;
        }
        if let Some(ttl) = overrides.cache_ttl {
            self.cache.ttl_override = ttl;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.dns.query_timeout_ms = timeout;
        }
        if !overrides.root_servers.is_empty() {
            self.dns.root_servers = overrides.root_servers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.dns.upstream_port == 0 {
            return Err(ConfigError::Validation(
                "Upstream port cannot be 0".to_string(),
            ));
        }

        if self.dns.root_servers.is_empty() {
            return Err(ConfigError::Validation(
                "No root servers configured".to_string(),
            ));
        }

        if self.dns.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout must be positive".to_string(),
            ));
        }

        if self.dns.max_referral_hops == 0 {
            return Err(ConfigError::Validation(
                "max_referral_hops must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub zone_path: Option<String>,
    pub cache_path: Option<String>,
    pub disable_cache: bool,
    pub cache_ttl: Option<u32>,
    pub query_timeout_ms: Option<u64>,
    pub root_servers: Vec<std::net::Ipv4Addr>,
    pub log_level: Option<String>,
}
