use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// When non-zero, every cached record lives this many seconds instead of
    /// its own TTL.
    #[serde(default)]
    pub ttl_override: u32,

    #[serde(default)]
    pub snapshot_path: Option<String>,

    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_override: 0,
            snapshot_path: None,
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_snapshot_interval() -> u64 {
    300
}
