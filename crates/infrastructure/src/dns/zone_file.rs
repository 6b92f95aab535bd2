//! Master file reader for the locally served zone.
//!
//! One record per line, `name ttl TYPE rdata` with an optional `IN` class
//! column after the TTL. `;` starts a comment. Only NS, A and CNAME records
//! are kept; other types are skipped.

use iterdns_domain::{DomainError, Name, RData, RecordClass, ResourceRecord, Zone};
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::{debug, info, warn};

pub fn load_zone(path: &Path) -> Result<Zone, DomainError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DomainError::ZoneFile(format!("{}: {}", path.display(), e)))?;
    let zone = parse_master_file(&contents);
    info!(path = %path.display(), names = zone.len(), "Zone loaded");
    Ok(zone)
}

/// Malformed lines are logged and skipped; the rest of the file still loads.
pub fn parse_master_file(contents: &str) -> Zone {
    let mut zone = Zone::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.split(';').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(Some(record)) => zone.insert(record),
            Ok(None) => debug!(line = index + 1, "Skipping unsupported record type"),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed zone line"),
        }
    }

    zone
}

fn parse_line(line: &str) -> Result<Option<ResourceRecord>, DomainError> {
    let mut fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() >= 5 && fields[2].eq_ignore_ascii_case("IN") {
        fields.remove(2);
    }

    let [owner, ttl, rtype, rdata, ..] = fields.as_slice() else {
        return Err(DomainError::ZoneFile(format!(
            "expected `name ttl TYPE rdata`, got {} fields",
            fields.len()
        )));
    };

    let name: Name = owner.parse()?;
    let ttl: u32 = ttl
        .parse()
        .map_err(|_| DomainError::ZoneFile(format!("invalid TTL `{}`", ttl)))?;

    let rdata = match rtype.to_ascii_uppercase().as_str() {
        "A" => RData::A {
            address: rdata
                .parse::<Ipv4Addr>()
                .map_err(|_| DomainError::InvalidIpAddress(rdata.to_string()))?,
        },
        "NS" => RData::NS {
            nameserver: rdata.parse()?,
        },
        "CNAME" => RData::CNAME {
            alias: rdata.parse()?,
        },
        _ => return Ok(None),
    };

    Ok(Some(ResourceRecord::new(name, RecordClass::IN, ttl, rdata)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_class_column() {
        let record = parse_line("www.example.test. 300 IN A 192.0.2.7")
            .unwrap()
            .unwrap();
        assert_eq!(record.ttl, 300);
        assert_eq!(record.rdata.address(), Some(Ipv4Addr::new(192, 0, 2, 7)));
    }

    #[test]
    fn test_parse_line_rejects_short_lines() {
        assert!(parse_line("example.test. 300 A").is_err());
    }

    #[test]
    fn test_parse_line_rejects_bad_ttl() {
        assert!(parse_line("example.test. soon A 1.2.3.4").is_err());
    }
}
