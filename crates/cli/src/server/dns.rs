use iterdns_infrastructure::dns::DnsServerHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_SIZE: usize = 4096;
const RESPONSE_QUEUE_DEPTH: usize = 1024;

/// Serves UDP until `shutdown` fires.
///
/// One receive loop hands every datagram to its own task; replies travel
/// back over a channel to a single task that owns socket writes.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
    info!(bind_address = %socket.local_addr()?, "DNS server listening");

    let (tx, mut rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(RESPONSE_QUEUE_DEPTH);

    let send_socket = socket.clone();
    let sender = tokio::spawn(async move {
        while let Some((response, peer)) = rx.recv().await {
            if let Err(e) = send_socket.send_to(&response, peer).await {
                warn!(client = %peer, error = %e, "Failed to send DNS response");
            }
        }
        debug!("DNS response sender stopped");
    });

    let mut recv_buf = vec![0u8; RECV_BUFFER_SIZE];
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS server shutting down");
                break;
            }
            result = socket.recv_from(&mut recv_buf) => {
                let (len, peer) = match result {
                    Ok(received) => received,
                    Err(e) => {
                        error!(error = %e, "UDP recv error");
                        continue;
                    }
                };

                let datagram = recv_buf[..len].to_vec();
                let handler = handler.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = handler.handle_datagram(&datagram, peer).await {
                        let _ = tx.send((response, peer)).await;
                    }
                });
            }
        }
    }

    drop(tx);
    let _ = sender.await;
    Ok(())
}
