use super::RecordType;
use crate::name::Name;
use std::fmt;
use std::net::Ipv4Addr;

/// Type-specific payload of a resource record.
///
/// The variant is chosen from the wire TYPE code at decode time; anything
/// other than A, NS and CNAME is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RData {
    A { address: Ipv4Addr },
    NS { nameserver: Name },
    CNAME { alias: Name },
    Unknown { rtype: u16, data: Vec<u8> },
}

impl RData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A { .. } => RecordType::A,
            RData::NS { .. } => RecordType::NS,
            RData::CNAME { .. } => RecordType::CNAME,
            RData::Unknown { rtype, .. } => RecordType::from_u16(*rtype),
        }
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A { address } => Some(*address),
            _ => None,
        }
    }

    /// The name carried by NS and CNAME data.
    pub fn target(&self) -> Option<&Name> {
        match self {
            RData::NS { nameserver } => Some(nameserver),
            RData::CNAME { alias } => Some(alias),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A { address } => write!(f, "{}", address),
            RData::NS { nameserver } => write!(f, "{}", nameserver),
            RData::CNAME { alias } => write!(f, "{}", alias),
            RData::Unknown { data, .. } => {
                write!(f, "\\# {}", data.len())?;
                for byte in data {
                    write!(f, " {:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}
