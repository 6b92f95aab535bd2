/// Why a configuration could not be used. Nothing is served until these
/// are fixed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("config file is not valid TOML: {0}")]
    Toml(String),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
