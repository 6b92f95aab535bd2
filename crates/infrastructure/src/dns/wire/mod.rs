//! RFC 1035 message encoding.
//!
//! Encoding never compresses names. Decoding accepts compression pointers
//! anywhere a name may appear, including inside NS and CNAME data.

mod header;
mod name;
mod reader;
mod record;

pub use header::HEADER_LEN;
pub use name::{read_name, write_name, MAX_POINTER_JUMPS};
pub use reader::WireReader;

use iterdns_domain::{DomainError, Message, ResourceRecord};

pub fn encode(message: &Message) -> Vec<u8> {
    let mut out = Vec::with_capacity(512);
    header::write_header(&mut out, &message.header, message.counts());
    for question in &message.questions {
        record::write_question(&mut out, question);
    }
    for rr in message.all_records() {
        record::write_record(&mut out, rr);
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
    let mut reader = WireReader::new(bytes);
    let (header, [qdcount, ancount, nscount, arcount]) = header::read_header(&mut reader)?;

    let questions = (0..qdcount)
        .map(|_| record::read_question(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;
    let answers = read_section(&mut reader, ancount)?;
    let authorities = read_section(&mut reader, nscount)?;
    let additionals = read_section(&mut reader, arcount)?;

    Ok(Message {
        header,
        questions,
        answers,
        authorities,
        additionals,
    })
}

/// Transaction id of a datagram too damaged to decode, if it has one.
pub fn peek_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [high, low, ..] => Some(u16::from_be_bytes([*high, *low])),
        _ => None,
    }
}

fn read_section(reader: &mut WireReader<'_>, count: u16) -> Result<Vec<ResourceRecord>, DomainError> {
    (0..count).map(|_| record::read_record(reader)).collect()
}
