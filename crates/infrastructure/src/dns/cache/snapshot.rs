//! On-disk JSON form of the cache.

use super::record::CachedRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use iterdns_domain::{Name, RData, RecordClass, RecordType, ResourceRecord};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Loading reads `records` as raw JSON values and decodes each one apart,
/// dropping only the records that fail.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotFile<R = SnapshotRecord> {
    pub version: u32,
    pub saved_at_millis: u64,
    pub records: Vec<R>,
}

/// Names are stored in escaped presentation form, which round-trips any
/// label bytes.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub class: String,
    pub expires_at_millis: u64,
    pub rdata: SnapshotRData,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum SnapshotRData {
    A { address: Ipv4Addr },
    NS { nameserver: String },
    CNAME { alias: String },
    Unknown { rtype: u16, data: String },
}

impl From<&CachedRecord> for SnapshotRecord {
    fn from(entry: &CachedRecord) -> Self {
        let record = &entry.record;
        let rdata = match &record.rdata {
            RData::A { address } => SnapshotRData::A { address: *address },
            RData::NS { nameserver } => SnapshotRData::NS {
                nameserver: nameserver.to_string(),
            },
            RData::CNAME { alias } => SnapshotRData::CNAME {
                alias: alias.to_string(),
            },
            RData::Unknown { rtype, data } => SnapshotRData::Unknown {
                rtype: *rtype,
                data: STANDARD.encode(data),
            },
        };

        Self {
            name: record.name.to_string(),
            record_type: record.record_type().to_string(),
            class: record.class.to_string(),
            expires_at_millis: entry.expires_at_millis,
            rdata,
        }
    }
}

impl TryFrom<SnapshotRecord> for CachedRecord {
    type Error = String;

    fn try_from(snapshot: SnapshotRecord) -> Result<Self, Self::Error> {
        let name = parse_name(&snapshot.name)?;
        let class: RecordClass = snapshot.class.parse()?;
        let declared: RecordType = snapshot.record_type.parse()?;
        let rdata = match snapshot.rdata {
            SnapshotRData::A { address } => RData::A { address },
            SnapshotRData::NS { nameserver } => RData::NS {
                nameserver: parse_name(&nameserver)?,
            },
            SnapshotRData::CNAME { alias } => RData::CNAME {
                alias: parse_name(&alias)?,
            },
            SnapshotRData::Unknown { rtype, data } => RData::Unknown {
                rtype,
                data: STANDARD
                    .decode(data)
                    .map_err(|e| format!("invalid base64 record data: {}", e))?,
            },
        };

        if rdata.record_type() != declared {
            return Err(format!(
                "{} record carries {} data",
                declared,
                rdata.record_type()
            ));
        }

        Ok(Self {
            record: ResourceRecord::new(name, class, 0, rdata),
            expires_at_millis: snapshot.expires_at_millis,
        })
    }
}

fn parse_name(text: &str) -> Result<Name, String> {
    text.parse::<Name>().map_err(|e| e.to_string())
}
