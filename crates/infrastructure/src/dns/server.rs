use crate::dns::wire;
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::{Header, Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns one inbound datagram into the bytes of its reply.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// `None` when nothing should be sent back: the datagram is too short to
    /// carry an id, or it is itself a response.
    pub async fn handle_datagram(&self, bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match wire::decode(bytes) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %client, error = %e, bytes = bytes.len(), "Malformed query");
                return format_error_response(bytes).map(|response| wire::encode(&response));
            }
        };

        if request.header.qr {
            debug!(client = %client, id = request.header.id, "Ignoring response sent to server");
            return None;
        }

        if let Some(question) = request.questions.first() {
            debug!(
                client = %client,
                id = request.header.id,
                question = %question,
                rd = request.header.rd,
                "DNS query received"
            );
        }

        let response = self.use_case.execute(&request).await;
        Some(wire::encode(&response))
    }
}

/// FORMERR reply for bytes that did not decode, echoing whatever header
/// fields arrived intact.
fn format_error_response(bytes: &[u8]) -> Option<Message> {
    let id = wire::peek_id(bytes)?;
    let mut header = match bytes.get(2..4) {
        Some(flags) => Header::from_flags(id, u16::from_be_bytes([flags[0], flags[1]])),
        None => Header::query(id, false),
    };
    header.qr = true;
    header.aa = false;
    header.tc = false;
    header.ra = true;
    header.z = 0;
    header.rcode = ResponseCode::FormErr;

    Some(Message {
        header,
        ..Message::default()
    })
}
