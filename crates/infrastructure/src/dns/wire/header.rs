use super::reader::WireReader;
use iterdns_domain::{DomainError, Header};

pub const HEADER_LEN: usize = 12;

pub fn write_header(out: &mut Vec<u8>, header: &Header, counts: [u16; 4]) {
    out.extend_from_slice(&header.id.to_be_bytes());
    out.extend_from_slice(&header.flags().to_be_bytes());
    for count in counts {
        out.extend_from_slice(&count.to_be_bytes());
    }
}

/// Header plus QDCOUNT, ANCOUNT, NSCOUNT, ARCOUNT.
pub fn read_header(reader: &mut WireReader<'_>) -> Result<(Header, [u16; 4]), DomainError> {
    if reader.remaining() < HEADER_LEN {
        return Err(DomainError::ProtocolFormat(format!(
            "message of {} bytes is shorter than the header",
            reader.remaining()
        )));
    }
    let id = reader.read_u16("header id")?;
    let flags = reader.read_u16("header flags")?;
    let mut counts = [0u16; 4];
    for count in counts.iter_mut() {
        *count = reader.read_u16("header counts")?;
    }
    Ok((Header::from_flags(id, flags), counts))
}
