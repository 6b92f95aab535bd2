use super::cache_layer::{cached_nameservers, store_response};
use super::config::ResolverConfig;
use crate::dns::transport::DnsTransport;
use crate::dns::wire;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use iterdns_application::ports::{DnsResolver, RecordStore};
use iterdns_application::services::{chase_cached, CachedChain};
use iterdns_domain::{
    DomainError, Message, Name, Question, RecordClass, RecordType, Resolution, ResourceRecord,
    ResponseCode,
};
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Iterative resolver (RFC 1034 §5.3.3) that walks referrals from the root
/// hints or the closest cached delegation, one server at a time.
pub struct IterativeResolver {
    transport: Arc<dyn DnsTransport>,
    cache: Option<Arc<dyn RecordStore>>,
    config: ResolverConfig,
}

/// Aliases crossed towards `canonical`, and the addresses found there.
/// Empty `addresses` means the walk continues at `canonical`.
#[derive(Debug, Default)]
struct AnswerChain {
    aliases: Vec<Name>,
    records: Vec<ResourceRecord>,
    canonical: Name,
    addresses: Vec<Ipv4Addr>,
}

impl AnswerChain {
    fn starting_at(name: Name) -> Self {
        Self {
            canonical: name,
            ..Self::default()
        }
    }

    fn follow(&mut self, alias: ResourceRecord, target: Name) {
        let from = std::mem::replace(&mut self.canonical, target);
        self.aliases.push(from);
        self.records.push(alias);
    }

    fn append(&mut self, next: AnswerChain) {
        self.aliases.extend(next.aliases);
        self.records.extend(next.records);
        self.canonical = next.canonical;
        self.addresses = next.addresses;
    }

    fn into_resolution(self, cache_hit: bool) -> Resolution {
        Resolution {
            canonical_name: self.canonical,
            aliases: self.aliases,
            addresses: self.addresses,
            answers: self.records,
            cache_hit,
        }
    }
}

/// Upstream queries left for one top-level resolution, nested name server
/// lookups and alias hops included.
struct QueryBudget {
    remaining: usize,
}

impl QueryBudget {
    fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    /// Takes one query, `false` once the budget is spent.
    fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn is_spent(&self) -> bool {
        self.remaining == 0
    }
}

/// What one upstream response tells us to do next.
enum ResponseAction {
    Answer(AnswerChain),
    /// Glue addresses replacing the candidate list.
    Referral(Vec<Ipv4Addr>),
    /// Name servers without glue.
    Delegation(Vec<Name>),
    NxDomain,
    Unusable,
}

impl IterativeResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, config: ResolverConfig) -> Self {
        Self {
            transport,
            cache: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn RecordStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Boxed so that resolving a name server name can recurse.
    fn resolve_name<'a>(
        &'a self,
        hostname: Name,
        depth: usize,
        budget: &'a mut QueryBudget,
    ) -> BoxFuture<'a, Resolution> {
        async move {
            let mut chain = AnswerChain::starting_at(hostname.clone());

            loop {
                if let Some(cache) = self.cache.as_deref() {
                    let alias_budget =
                        self.config.max_cname_chain.saturating_sub(chain.aliases.len());
                    match chase_cached(cache, &chain.canonical, alias_budget) {
                        CachedChain::Resolved(found) => {
                            let cache_hit = chain.aliases.is_empty();
                            chain.aliases.extend(found.aliases);
                            chain.records.extend(found.answers);
                            chain.canonical = found.canonical_name;
                            chain.addresses = found.addresses;
                            return chain.into_resolution(cache_hit);
                        }
                        CachedChain::Partial {
                            aliases,
                            target,
                            records,
                        } => {
                            chain.aliases.extend(aliases);
                            chain.records.extend(records);
                            chain.canonical = target;
                        }
                        CachedChain::Miss => {}
                    }
                }

                let target = chain.canonical.clone();
                let candidates = self.initial_candidates(&target);
                let Some(step) = self
                    .query_candidates(&target, candidates, depth, budget)
                    .await
                else {
                    return Resolution::failure(hostname);
                };

                chain.append(step);
                if !chain.addresses.is_empty() {
                    return chain.into_resolution(false);
                }
                if chain.aliases.len() > self.config.max_cname_chain {
                    warn!(
                        domain = %hostname,
                        aliases = chain.aliases.len(),
                        "Alias chain too long, giving up"
                    );
                    return Resolution::failure(hostname);
                }
                debug!(domain = %hostname, next = %chain.canonical, "Following alias");
            }
        }
        .boxed()
    }

    fn initial_candidates(&self, target: &Name) -> Vec<SocketAddr> {
        let seeded = match self.cache.as_deref() {
            Some(cache) => cached_nameservers(cache, target),
            None => Vec::new(),
        };
        if seeded.is_empty() {
            self.config.root_candidates()
        } else {
            seeded
                .into_iter()
                .map(|address| self.config.upstream(address))
                .collect()
        }
    }

    /// Queries candidates in order until one yields an answer for `target`
    /// or the list (or the query budget) runs out.
    async fn query_candidates(
        &self,
        target: &Name,
        candidates: Vec<SocketAddr>,
        depth: usize,
        budget: &mut QueryBudget,
    ) -> Option<AnswerChain> {
        let mut candidates: VecDeque<SocketAddr> = candidates.into();

        while let Some(server) = candidates.pop_front() {
            if !budget.spend() {
                warn!(
                    domain = %target,
                    limit = self.config.max_referral_hops,
                    "Query budget spent, giving up"
                );
                return None;
            }

            let response = match self.query_server(server, target).await {
                Ok(response) => response,
                Err(e) => {
                    debug!(
                        domain = %target,
                        server = %server,
                        error = %e,
                        "Upstream query failed, trying next server"
                    );
                    continue;
                }
            };

            if let Some(cache) = self.cache.as_deref() {
                store_response(cache, &response);
            }

            match self.classify(target, &response) {
                ResponseAction::Answer(chain) => return Some(chain),
                ResponseAction::NxDomain => {
                    debug!(domain = %target, server = %server, "NXDOMAIN");
                    return None;
                }
                ResponseAction::Referral(glue) => {
                    debug!(domain = %target, server = %server, servers = glue.len(), "Referral");
                    candidates = glue
                        .into_iter()
                        .map(|address| self.config.upstream(address))
                        .collect();
                }
                ResponseAction::Delegation(nameservers) => {
                    if depth >= self.config.max_recursion_depth {
                        debug!(
                            domain = %target,
                            depth = depth,
                            "Name server resolution too deep, skipping delegation"
                        );
                        continue;
                    }
                    let addresses = self
                        .resolve_nameservers(&nameservers, depth + 1, budget)
                        .await;
                    if !addresses.is_empty() {
                        candidates = addresses
                            .into_iter()
                            .map(|address| self.config.upstream(address))
                            .collect();
                    }
                }
                ResponseAction::Unusable => {
                    debug!(
                        domain = %target,
                        server = %server,
                        rcode = response.header.rcode.as_str(),
                        "Response carries nothing usable"
                    );
                }
            }
        }

        None
    }

    /// Addresses of the first name server name that resolves.
    async fn resolve_nameservers(
        &self,
        nameservers: &[Name],
        depth: usize,
        budget: &mut QueryBudget,
    ) -> Vec<Ipv4Addr> {
        for nameserver in nameservers {
            if budget.is_spent() {
                break;
            }
            debug!(nameserver = %nameserver, depth = depth, "Resolving name server without glue");
            let resolution = self.resolve_name(nameserver.clone(), depth, budget).await;
            if resolution.is_resolved() {
                return resolution.addresses;
            }
        }
        Vec::new()
    }

    async fn query_server(&self, server: SocketAddr, target: &Name) -> Result<Message, DomainError> {
        let id = fastrand::u16(..);
        let query = Message::query(id, Question::a(target.clone()), false);

        let reply = self
            .transport
            .send(server, &wire::encode(&query), self.config.query_timeout)
            .await?;
        let response = wire::decode(&reply)?;

        if response.header.id != id {
            return Err(DomainError::ProtocolFormat(format!(
                "response id {} does not match query id {}",
                response.header.id, id
            )));
        }
        if !response.header.qr {
            return Err(DomainError::ProtocolFormat(
                "upstream sent a query instead of a response".to_string(),
            ));
        }
        Ok(response)
    }

    fn classify(&self, target: &Name, response: &Message) -> ResponseAction {
        match response.header.rcode {
            ResponseCode::NoError => {}
            ResponseCode::NxDomain => return ResponseAction::NxDomain,
            _ => return ResponseAction::Unusable,
        }

        if let Some(chain) = self.follow_answers(target, &response.answers) {
            return ResponseAction::Answer(chain);
        }

        let glue: Vec<Ipv4Addr> = response
            .additionals
            .iter()
            .filter(|r| r.class == RecordClass::IN)
            .filter_map(|r| r.rdata.address())
            .collect();
        if !glue.is_empty() {
            return ResponseAction::Referral(glue);
        }

        let nameservers: Vec<Name> = response
            .authorities
            .iter()
            .filter(|r| r.record_type() == RecordType::NS)
            .filter_map(|r| r.rdata.target().cloned())
            .collect();
        if !nameservers.is_empty() {
            return ResponseAction::Delegation(nameservers);
        }

        ResponseAction::Unusable
    }

    /// Walks the answer section from `target` through any CNAMEs it carries.
    /// `None` when the section says nothing about `target`.
    fn follow_answers(&self, target: &Name, answers: &[ResourceRecord]) -> Option<AnswerChain> {
        let mut chain = AnswerChain::starting_at(target.clone());

        loop {
            let addresses: Vec<&ResourceRecord> = answers
                .iter()
                .filter(|r| r.matches(&chain.canonical, RecordType::A, RecordClass::IN))
                .collect();
            if !addresses.is_empty() {
                chain.addresses = addresses.iter().filter_map(|r| r.rdata.address()).collect();
                chain.records.extend(addresses.into_iter().cloned());
                return Some(chain);
            }

            if chain.aliases.len() >= self.config.max_cname_chain {
                break;
            }

            let alias = answers
                .iter()
                .find(|r| r.matches(&chain.canonical, RecordType::CNAME, RecordClass::IN));
            match alias.and_then(|r| r.rdata.target().map(|t| (r, t))) {
                Some((record, next)) => chain.follow(record.clone(), next.clone()),
                None => break,
            }
        }

        if chain.aliases.is_empty() {
            None
        } else {
            Some(chain)
        }
    }
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(&self, hostname: &Name) -> Resolution {
        let start = Instant::now();
        let mut budget = QueryBudget::new(self.config.max_referral_hops);
        let resolution = self.resolve_name(hostname.clone(), 0, &mut budget).await;

        if resolution.is_resolved() {
            info!(
                domain = %hostname,
                canonical = %resolution.canonical_name,
                aliases = resolution.aliases.len(),
                addresses = resolution.addresses.len(),
                cache_hit = resolution.cache_hit,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Resolved"
            );
        } else {
            info!(
                domain = %hostname,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Resolution failed"
            );
        }

        resolution
    }
}
