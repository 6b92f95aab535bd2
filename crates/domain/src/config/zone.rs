use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ZoneConfig {
    /// Master file with the locally authoritative records.
    #[serde(default)]
    pub path: Option<String>,
}
