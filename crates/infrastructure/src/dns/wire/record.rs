use super::name::{read_name, write_name};
use super::reader::WireReader;
use iterdns_domain::{
    DomainError, Name, Question, RData, RecordClass, RecordType, ResourceRecord,
};
use std::net::Ipv4Addr;

pub fn write_question(out: &mut Vec<u8>, question: &Question) {
    write_name(out, &question.name);
    out.extend_from_slice(&question.qtype.to_u16().to_be_bytes());
    out.extend_from_slice(&question.qclass.to_u16().to_be_bytes());
}

pub fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let name = read_name(reader)?;
    let qtype = RecordType::from_u16(reader.read_u16("question type")?);
    let qclass = RecordClass::from_u16(reader.read_u16("question class")?);
    Ok(Question::new(name, qtype, qclass))
}

pub fn write_record(out: &mut Vec<u8>, record: &ResourceRecord) {
    write_name(out, &record.name);
    out.extend_from_slice(&record.record_type().to_u16().to_be_bytes());
    out.extend_from_slice(&record.class.to_u16().to_be_bytes());
    out.extend_from_slice(&record.ttl.to_be_bytes());

    let length_at = out.len();
    out.extend_from_slice(&[0, 0]);
    match &record.rdata {
        RData::A { address } => out.extend_from_slice(&address.octets()),
        RData::NS { nameserver } => write_name(out, nameserver),
        RData::CNAME { alias } => write_name(out, alias),
        RData::Unknown { data, .. } => out.extend_from_slice(data),
    }
    let rdlength = (out.len() - length_at - 2) as u16;
    out[length_at..length_at + 2].copy_from_slice(&rdlength.to_be_bytes());
}

pub fn read_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let name = read_name(reader)?;
    let rtype = reader.read_u16("record type")?;
    let class = RecordClass::from_u16(reader.read_u16("record class")?);
    let ttl = reader.read_u32("record ttl")?;
    let rdlength = reader.read_u16("record length")? as usize;

    if rdlength > reader.remaining() {
        return Err(DomainError::Truncated {
            claimed: rdlength,
            remaining: reader.remaining(),
        });
    }

    let rdata_end = reader.position() + rdlength;
    let rdata = match RecordType::from_u16(rtype) {
        RecordType::A => {
            if rdlength != 4 {
                return Err(DomainError::ProtocolFormat(format!(
                    "A record data is {} bytes, expected 4",
                    rdlength
                )));
            }
            let octets = reader.read_bytes(4, "A record data")?;
            RData::A {
                address: Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
            }
        }
        RecordType::NS => RData::NS {
            nameserver: read_name_rdata(reader, rdata_end)?,
        },
        RecordType::CNAME => RData::CNAME {
            alias: read_name_rdata(reader, rdata_end)?,
        },
        _ => RData::Unknown {
            rtype,
            data: reader.read_bytes(rdlength, "record data")?.to_vec(),
        },
    };

    Ok(ResourceRecord::new(name, class, ttl, rdata))
}

/// A name that must fill its RDATA exactly.
fn read_name_rdata(reader: &mut WireReader<'_>, rdata_end: usize) -> Result<Name, DomainError> {
    let name = read_name(reader)?;
    if reader.position() != rdata_end {
        return Err(DomainError::ProtocolFormat(format!(
            "name in record data ends at offset {}, record data ends at {}",
            reader.position(),
            rdata_end
        )));
    }
    Ok(name)
}
