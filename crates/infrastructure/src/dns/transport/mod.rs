pub mod udp;

use async_trait::async_trait;
use iterdns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// One request/response exchange with an upstream name server.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends `message_bytes` to `server` and waits at most `timeout` for the
    /// reply datagram.
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
