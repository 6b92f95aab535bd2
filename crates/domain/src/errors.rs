use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Malformed DNS message: {0}")]
    ProtocolFormat(String),

    #[error("Truncated DNS message: record data claims {claimed} bytes but only {remaining} remain")]
    Truncated { claimed: usize, remaining: usize },

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Cache snapshot I/O error: {0}")]
    CacheIo(String),

    #[error("Zone file error: {0}")]
    ZoneFile(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors that make the resolver move on to the next candidate server.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::Transport { .. }
        )
    }

    pub fn is_format(&self) -> bool {
        matches!(
            self,
            DomainError::ProtocolFormat(_) | DomainError::Truncated { .. }
        )
    }
}
