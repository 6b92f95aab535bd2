use async_trait::async_trait;
use iterdns_domain::{DomainError, Message, Name, ResourceRecord, ResponseCode};
use iterdns_infrastructure::dns::transport::DnsTransport;
use iterdns_infrastructure::dns::wire;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

/// Sections of a scripted upstream reply.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub rcode: ResponseCode,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Reply {
    pub fn answer(answers: Vec<ResourceRecord>) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn referral(authorities: Vec<ResourceRecord>, additionals: Vec<ResourceRecord>) -> Self {
        Self {
            authorities,
            additionals,
            ..Self::default()
        }
    }

    pub fn nxdomain() -> Self {
        Self {
            rcode: ResponseCode::NxDomain,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Respond(Reply),
    /// Never answers; the exchange takes the full timeout.
    Silent,
    /// Answers with the wrong transaction id.
    MismatchedId(Reply),
    /// Answers with bytes that do not decode.
    Garbage,
}

/// Upstream servers answering from a script keyed by server and query name.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(SocketAddr, Name), Behavior>>,
    defaults: Mutex<HashMap<SocketAddr, Behavior>>,
    log: Mutex<Vec<(SocketAddr, Name)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, server: SocketAddr, qname: &Name, behavior: Behavior) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert((server, qname.clone()), behavior);
        self
    }

    /// Behaviour for any name without its own entry.
    pub fn on_any(&self, server: SocketAddr, behavior: Behavior) -> &Self {
        self.defaults.lock().unwrap().insert(server, behavior);
        self
    }

    /// Every (server, query name) sent so far, in order.
    pub fn queries(&self) -> Vec<(SocketAddr, Name)> {
        self.log.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    fn behavior_for(&self, server: SocketAddr, qname: &Name) -> Behavior {
        if let Some(behavior) = self.replies.lock().unwrap().get(&(server, qname.clone())) {
            return behavior.clone();
        }
        self.defaults
            .lock()
            .unwrap()
            .get(&server)
            .cloned()
            .unwrap_or(Behavior::Silent)
    }
}

fn build_reply(query: &Message, reply: Reply) -> Message {
    let mut response = Message::response_to(query);
    response.header.ra = false;
    response.header.rcode = reply.rcode;
    response.answers = reply.answers;
    response.authorities = reply.authorities;
    response.additionals = reply.additionals;
    response
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let query = wire::decode(message_bytes).expect("resolver sent an undecodable query");
        assert!(!query.header.rd, "iterative queries must not ask for recursion");
        let qname = query.questions[0].name.clone();
        self.log.lock().unwrap().push((server, qname.clone()));

        match self.behavior_for(server, &qname) {
            Behavior::Respond(reply) => Ok(wire::encode(&build_reply(&query, reply))),
            Behavior::MismatchedId(reply) => {
                let mut response = build_reply(&query, reply);
                response.header.id = query.header.id.wrapping_add(1);
                Ok(wire::encode(&response))
            }
            Behavior::Garbage => Ok(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            Behavior::Silent => {
                tokio::time::sleep(timeout).await;
                Err(DomainError::TransportTimeout {
                    server: server.to_string(),
                })
            }
        }
    }

    fn protocol_name(&self) -> &'static str {
        "SCRIPTED"
    }
}
