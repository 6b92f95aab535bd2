use crate::dns_message::Question;
use crate::dns_record::{RecordClass, RecordType, ResourceRecord};
use crate::name::Name;
use std::collections::HashMap;

/// Upper bound on CNAME hops followed inside local zone data.
const MAX_ZONE_CNAME_CHAIN: usize = 8;

/// Locally authoritative data: owner name to its records, in file order.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Zone {
    nodes: HashMap<Name, Vec<ResourceRecord>>,
}

/// Outcome of looking a question up in the zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneAnswer {
    /// The name exists here with data of the requested type.
    Authoritative(Vec<ResourceRecord>),
    /// The name lies below a delegation point held in the zone.
    Referral {
        authorities: Vec<ResourceRecord>,
        additionals: Vec<ResourceRecord>,
    },
    NotFound,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups records by owner name, keeping their relative order.
    pub fn from_records(records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        let mut zone = Self::new();
        for record in records {
            zone.insert(record);
        }
        zone
    }

    pub fn insert(&mut self, record: ResourceRecord) {
        self.nodes
            .entry(record.name.clone())
            .or_default()
            .push(record);
    }

    pub fn node(&self, name: &Name) -> Option<&[ResourceRecord]> {
        self.nodes.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node whose owner is the longest suffix of `name`.
    pub fn closest_node(&self, name: &Name) -> Option<(Name, &[ResourceRecord])> {
        name.suffixes()
            .find_map(|suffix| self.nodes.get(&suffix).map(|r| (suffix, r.as_slice())))
    }

    pub fn lookup(&self, question: &Question) -> ZoneAnswer {
        let Some((owner, records)) = self.closest_node(&question.name) else {
            return ZoneAnswer::NotFound;
        };

        if owner == question.name {
            let answers = self.answers_at(&question.name, question.qtype, question.qclass);
            if !answers.is_empty() {
                return ZoneAnswer::Authoritative(answers);
            }
        }

        let authorities: Vec<ResourceRecord> = records
            .iter()
            .filter(|r| r.record_type() == RecordType::NS && class_matches(question.qclass, r))
            .cloned()
            .collect();
        if authorities.is_empty() {
            return ZoneAnswer::NotFound;
        }

        let additionals = authorities
            .iter()
            .filter_map(|ns| ns.rdata.target())
            .filter_map(|nameserver| self.nodes.get(nameserver))
            .flat_map(|glue| glue.iter())
            .filter(|r| r.record_type() == RecordType::A)
            .cloned()
            .collect();

        ZoneAnswer::Referral {
            authorities,
            additionals,
        }
    }

    /// Records at exactly `name`, following in-zone CNAMEs when the name
    /// holds an alias instead of the requested type.
    fn answers_at(&self, name: &Name, qtype: RecordType, qclass: RecordClass) -> Vec<ResourceRecord> {
        let mut answers = Vec::new();
        let mut current = name.clone();

        for _ in 0..=MAX_ZONE_CNAME_CHAIN {
            let Some(records) = self.nodes.get(&current) else {
                break;
            };

            let direct: Vec<&ResourceRecord> = records
                .iter()
                .filter(|r| type_matches(qtype, r) && class_matches(qclass, r))
                .collect();
            if !direct.is_empty() {
                answers.extend(direct.into_iter().cloned());
                break;
            }

            let Some(alias) = records
                .iter()
                .find(|r| r.record_type() == RecordType::CNAME && class_matches(qclass, r))
            else {
                break;
            };
            answers.push(alias.clone());
            match alias.rdata.target() {
                Some(target) => current = target.clone(),
                None => break,
            }
        }

        answers
    }
}

fn type_matches(qtype: RecordType, record: &ResourceRecord) -> bool {
    qtype == RecordType::ANY || record.record_type() == qtype
}

fn class_matches(qclass: RecordClass, record: &ResourceRecord) -> bool {
    qclass == RecordClass::ANY || record.class == qclass
}
