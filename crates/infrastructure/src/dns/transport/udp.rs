//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is, one datagram each way. Truncated replies are
//! returned as received; there is no TCP retry.

use super::DnsTransport;
use async_trait::async_trait;
use iterdns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Receive buffer; plain DNS over UDP caps replies at 512 bytes but some
/// servers send more.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP, a fresh ephemeral socket per exchange.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }

    async fn exchange(server: SocketAddr, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| transport_error(server, format!("failed to bind UDP socket: {}", e)))?;

        let bytes_sent = socket
            .send_to(message_bytes, server)
            .await
            .map_err(|e| transport_error(server, format!("send failed: {}", e)))?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (bytes_received, from_addr) = socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| transport_error(server, format!("receive failed: {}", e)))?;

            if from_addr.ip() != server.ip() {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %server, bytes_received = bytes_received, "UDP response received");
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        tokio::time::timeout(timeout, Self::exchange(server, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

fn transport_error(server: SocketAddr, reason: String) -> DomainError {
    DomainError::Transport {
        server: server.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_creation() {
        let transport = UdpTransport::new();
        assert_eq!(transport.protocol_name(), "UDP");
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = silent.local_addr().unwrap();

        let result = UdpTransport::new()
            .send(server, &[0u8; 12], Duration::from_millis(100))
            .await;

        assert_eq!(
            result,
            Err(DomainError::TransportTimeout {
                server: server.to_string()
            })
        );
    }
}
