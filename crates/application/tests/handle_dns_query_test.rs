mod helpers;

use helpers::{a, cname, name, ns, query, InMemoryRecordStore, MockDnsResolver};
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::{
    Opcode, Question, RecordClass, RecordType, Resolution, ResponseCode, Zone,
};
use std::net::Ipv4Addr;
use std::sync::Arc;

fn make_use_case(
    zone: Zone,
    store: Option<Arc<InMemoryRecordStore>>,
    resolver: Arc<MockDnsResolver>,
) -> HandleDnsQueryUseCase {
    let use_case = HandleDnsQueryUseCase::new(Arc::new(zone), resolver);
    match store {
        Some(store) => use_case.with_cache(store),
        None => use_case,
    }
}

// ── zone answers ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_zone_answer_is_authoritative() {
    let zone = Zone::from_records(vec![a("example.test", 3600, "1.1.1.1")]);
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(zone, None, resolver.clone());

    let request = query("example.test", RecordType::A, false);
    let response = use_case.execute(&request).await;

    assert_eq!(response.header.id, request.header.id);
    assert!(response.header.qr);
    assert!(response.header.aa);
    assert!(response.header.ra);
    assert!(!response.header.rd);
    assert!(!response.header.tc);
    assert_eq!(response.header.rcode, ResponseCode::NoError);
    assert_eq!(response.questions, request.questions);
    assert_eq!(response.answers, vec![a("example.test", 3600, "1.1.1.1")]);
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn test_zone_delegation_is_referral() {
    let zone = Zone::from_records(vec![
        ns("sub.example.test", 3600, "ns.sub.example.test"),
        a("ns.sub.example.test", 3600, "10.0.0.1"),
    ]);
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(zone, None, resolver.clone());

    let response = use_case
        .execute(&query("www.sub.example.test", RecordType::A, true))
        .await;

    assert!(!response.header.aa);
    assert_eq!(response.header.rcode, ResponseCode::NoError);
    assert!(response.answers.is_empty());
    assert_eq!(
        response.authorities,
        vec![ns("sub.example.test", 3600, "ns.sub.example.test")]
    );
    assert_eq!(response.additionals, vec![a("ns.sub.example.test", 3600, "10.0.0.1")]);
    assert_eq!(resolver.call_count(), 0);
}

// ── cache answers ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cache_chases_cname_without_network() {
    let store = Arc::new(InMemoryRecordStore::with_records(vec![
        cname("foo.test", 300, "bar.test"),
        a("bar.test", 300, "2.2.2.2"),
    ]));
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), Some(store), resolver.clone());

    let response = use_case.execute(&query("foo.test", RecordType::A, true)).await;

    assert_eq!(response.header.rcode, ResponseCode::NoError);
    assert!(!response.header.aa);
    assert_eq!(
        response.answers,
        vec![cname("foo.test", 300, "bar.test"), a("bar.test", 300, "2.2.2.2")]
    );
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn test_cache_answers_non_address_types() {
    let store = Arc::new(InMemoryRecordStore::with_records(vec![ns(
        "example.test",
        300,
        "ns1.example.test",
    )]));
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), Some(store), resolver.clone());

    let response = use_case
        .execute(&query("example.test", RecordType::NS, false))
        .await;

    assert_eq!(response.answers, vec![ns("example.test", 300, "ns1.example.test")]);
    assert_eq!(response.header.rcode, ResponseCode::NoError);
}

// ── recursion ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_recursion_uses_resolver_answers() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_response(
        &name("www.remote.test"),
        Resolution {
            canonical_name: name("remote.test"),
            aliases: vec![name("www.remote.test")],
            addresses: vec![Ipv4Addr::new(5, 6, 7, 8)],
            answers: vec![
                cname("www.remote.test", 60, "remote.test"),
                a("remote.test", 60, "5.6.7.8"),
            ],
            cache_hit: false,
        },
    );
    let use_case = make_use_case(
        Zone::new(),
        Some(Arc::new(InMemoryRecordStore::new())),
        resolver.clone(),
    );

    let response = use_case
        .execute(&query("www.remote.test", RecordType::A, true))
        .await;

    assert_eq!(resolver.call_count(), 1);
    assert_eq!(response.header.rcode, ResponseCode::NoError);
    assert_eq!(response.answers.len(), 2);
    assert_eq!(response.answers[1], a("remote.test", 60, "5.6.7.8"));
}

#[tokio::test]
async fn test_partial_cached_chain_falls_through_to_resolver() {
    let store = Arc::new(InMemoryRecordStore::with_records(vec![cname(
        "foo.test",
        300,
        "gone.test",
    )]));
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), Some(store), resolver.clone());

    let response = use_case.execute(&query("foo.test", RecordType::A, true)).await;

    assert_eq!(resolver.call_count(), 1);
    assert_eq!(response.header.rcode, ResponseCode::NxDomain);
}

// ── negative answers ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_recursion_is_nxdomain() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), None, resolver.clone());

    let response = use_case
        .execute(&query("missing.test", RecordType::A, true))
        .await;

    assert_eq!(resolver.call_count(), 1);
    assert_eq!(response.header.rcode, ResponseCode::NxDomain);
    assert!(response.answers.is_empty());
}

#[tokio::test]
async fn test_no_recursion_desired_is_refused() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), None, resolver.clone());

    let response = use_case
        .execute(&query("missing.test", RecordType::A, false))
        .await;

    assert_eq!(resolver.call_count(), 0);
    assert_eq!(response.header.rcode, ResponseCode::Refused);
}

#[tokio::test]
async fn test_resolver_only_handles_address_queries() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), None, resolver.clone());

    let response = use_case
        .execute(&query("example.test", RecordType::MX, true))
        .await;

    assert_eq!(resolver.call_count(), 0);
    assert_eq!(response.header.rcode, ResponseCode::NxDomain);
}

#[tokio::test]
async fn test_non_query_opcode_is_notimp() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(
        Zone::from_records(vec![a("example.test", 3600, "1.1.1.1")]),
        None,
        resolver.clone(),
    );

    let mut request = query("example.test", RecordType::A, true);
    request.header.opcode = Opcode::Status;
    let response = use_case.execute(&request).await;

    assert_eq!(response.header.rcode, ResponseCode::NotImp);
    assert_eq!(response.header.opcode, Opcode::Status);
    assert!(response.answers.is_empty());
}

#[tokio::test]
async fn test_empty_question_section_is_formerr() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::new(), None, resolver);

    let mut request = query("example.test", RecordType::A, true);
    request.questions.clear();
    let response = use_case.execute(&request).await;

    assert_eq!(response.header.rcode, ResponseCode::FormErr);
}

#[tokio::test]
async fn test_oversized_sections_are_capped_and_truncated() {
    let delegation: Vec<_> = (0..40_000)
        .map(|i| ns("big.test", 3600, &format!("ns{}.elsewhere.test", i)))
        .collect();
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(Zone::from_records(delegation), None, resolver);

    let mut request = query("a.big.test", RecordType::A, false);
    request
        .questions
        .push(Question::new(name("b.big.test"), RecordType::A, RecordClass::IN));
    let response = use_case.execute(&request).await;

    assert!(response.header.tc);
    assert_eq!(response.header.rcode, ResponseCode::NoError);
    assert_eq!(response.counts(), [2, 0, u16::MAX, 0]);
}
