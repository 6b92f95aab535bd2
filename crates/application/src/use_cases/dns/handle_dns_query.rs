use crate::ports::{DnsResolver, RecordStore};
use crate::services::{chase_cached, CachedChain};
use iterdns_domain::{
    Message, Opcode, Question, RecordClass, RecordType, ResourceRecord, ResponseCode, Zone,
    ZoneAnswer,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

const DEFAULT_MAX_CNAME_CHAIN: usize = 8;

/// Most records one response section can announce in its 16-bit count.
const MAX_SECTION_RECORDS: usize = u16::MAX as usize;

/// Answers one decoded query: local zone first, then the cache, then the
/// resolver when recursion was requested.
pub struct HandleDnsQueryUseCase {
    zone: Arc<Zone>,
    cache: Option<Arc<dyn RecordStore>>,
    resolver: Arc<dyn DnsResolver>,
    max_cname_chain: usize,
}

/// Records gathered for a single question.
#[derive(Default)]
struct Sections {
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
    authoritative: bool,
}

impl Sections {
    fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.authorities.is_empty()
    }
}

impl HandleDnsQueryUseCase {
    pub fn new(zone: Arc<Zone>, resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            zone,
            cache: None,
            resolver,
            max_cname_chain: DEFAULT_MAX_CNAME_CHAIN,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn RecordStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_max_cname_chain(mut self, max_cname_chain: usize) -> Self {
        self.max_cname_chain = max_cname_chain;
        self
    }

    pub async fn execute(&self, request: &Message) -> Message {
        let start = Instant::now();
        let mut response = Message::response_to(request);

        if request.header.opcode != Opcode::Query {
            debug!(
                id = request.header.id,
                opcode = request.header.opcode.to_u8(),
                "Unsupported opcode"
            );
            return response.with_rcode(ResponseCode::NotImp);
        }

        if request.questions.is_empty() {
            return response.with_rcode(ResponseCode::FormErr);
        }

        let mut answered = false;

        for question in &request.questions {
            let sections = self.answer_question(question, request.header.rd).await;
            answered |= !sections.is_empty();
            response.header.aa |= sections.authoritative;
            let cut = append_capped(&mut response.answers, sections.answers)
                | append_capped(&mut response.authorities, sections.authorities)
                | append_capped(&mut response.additionals, sections.additionals);
            if cut {
                response.header.tc = true;
            }
        }

        if !answered {
            let rcode = if request.header.rd {
                ResponseCode::NxDomain
            } else {
                ResponseCode::Refused
            };
            response.header.rcode = rcode;
        }

        debug!(
            id = request.header.id,
            questions = request.questions.len(),
            answers = response.answers.len(),
            authorities = response.authorities.len(),
            rcode = response.header.rcode.as_str(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query handled"
        );

        response
    }

    async fn answer_question(&self, question: &Question, recursion_desired: bool) -> Sections {
        match self.zone.lookup(question) {
            ZoneAnswer::Authoritative(answers) => {
                debug!(question = %question, records = answers.len(), "Answered from zone");
                return Sections {
                    answers,
                    authoritative: true,
                    ..Sections::default()
                };
            }
            ZoneAnswer::Referral {
                authorities,
                additionals,
            } => {
                debug!(
                    question = %question,
                    nameservers = authorities.len(),
                    glue = additionals.len(),
                    "Referral from zone"
                );
                return Sections {
                    authorities,
                    additionals,
                    ..Sections::default()
                };
            }
            ZoneAnswer::NotFound => {}
        }

        if let Some(answers) = self.answer_from_cache(question) {
            return Sections {
                answers,
                ..Sections::default()
            };
        }

        if recursion_desired && is_address_query(question) {
            let resolution = self.resolver.resolve(&question.name).await;
            if resolution.is_resolved() {
                return Sections {
                    answers: resolution.answers,
                    ..Sections::default()
                };
            }
            debug!(question = %question, "Resolution failed");
        }

        Sections::default()
    }

    fn answer_from_cache(&self, question: &Question) -> Option<Vec<ResourceRecord>> {
        let cache = self.cache.as_deref()?;

        if is_address_query(question) {
            return match chase_cached(cache, &question.name, self.max_cname_chain) {
                CachedChain::Resolved(resolution) => Some(resolution.answers),
                CachedChain::Partial { .. } | CachedChain::Miss => None,
            };
        }

        let records = cache.lookup(&question.name, question.qtype, question.qclass);
        if records.is_empty() {
            None
        } else {
            debug!(question = %question, records = records.len(), "Answered from cache");
            Some(records)
        }
    }
}

/// Appends while the section has room; `true` when records were dropped.
fn append_capped(section: &mut Vec<ResourceRecord>, records: Vec<ResourceRecord>) -> bool {
    let room = MAX_SECTION_RECORDS.saturating_sub(section.len());
    let cut = records.len() > room;
    section.extend(records.into_iter().take(room));
    cut
}

fn is_address_query(question: &Question) -> bool {
    question.qtype == RecordType::A && question.qclass == RecordClass::IN
}
