use async_trait::async_trait;
use iterdns_domain::{Name, Resolution};

#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolves `hostname` to IPv4 addresses, following aliases.
    ///
    /// Never fails: when no server could provide an answer the result is
    /// [`Resolution::failure`].
    async fn resolve(&self, hostname: &Name) -> Resolution;
}
