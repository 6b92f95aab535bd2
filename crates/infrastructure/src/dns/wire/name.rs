use super::reader::WireReader;
use iterdns_domain::{DomainError, Name};

/// Top two bits of a length byte marking a compression pointer.
pub const POINTER_FLAG: u8 = 0b1100_0000;

/// Pointer jumps followed while decoding one name.
pub const MAX_POINTER_JUMPS: usize = 16;

/// Writes `name` as uncompressed length-prefixed labels.
pub fn write_name(out: &mut Vec<u8>, name: &Name) {
    for label in name.labels() {
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out.push(0);
}

/// Reads a possibly compressed name at the reader's position.
///
/// The reader ends up just past the name as it appears in place: after the
/// terminating zero, or after the first pointer.
pub fn read_name(reader: &mut WireReader<'_>) -> Result<Name, DomainError> {
    let buf = reader.buffer();
    let mut pos = reader.position();
    let mut resume_at = None;
    let mut jumps = 0;
    let mut labels: Vec<&[u8]> = Vec::new();
    let mut wire_len = 1;

    loop {
        let Some(&len) = buf.get(pos) else {
            return Err(DomainError::ProtocolFormat(format!(
                "name runs past end of message at offset {}",
                pos
            )));
        };

        match len & POINTER_FLAG {
            POINTER_FLAG => {
                let Some(&low) = buf.get(pos + 1) else {
                    return Err(DomainError::ProtocolFormat(
                        "compression pointer cut off".to_string(),
                    ));
                };
                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(DomainError::ProtocolFormat(
                        "compression pointer loop".to_string(),
                    ));
                }
                let target = (((len & !POINTER_FLAG) as usize) << 8) | low as usize;
                if target >= buf.len() {
                    return Err(DomainError::ProtocolFormat(format!(
                        "compression pointer to offset {} outside message",
                        target
                    )));
                }
                resume_at.get_or_insert(pos + 2);
                pos = target;
            }
            0 if len == 0 => {
                resume_at.get_or_insert(pos + 1);
                break;
            }
            0 => {
                let start = pos + 1;
                let end = start + len as usize;
                let Some(label) = buf.get(start..end) else {
                    return Err(DomainError::ProtocolFormat(format!(
                        "label at offset {} runs past end of message",
                        pos
                    )));
                };
                wire_len += 1 + label.len();
                if wire_len > Name::MAX_WIRE_LEN {
                    return Err(DomainError::ProtocolFormat(format!(
                        "name exceeds {} bytes",
                        Name::MAX_WIRE_LEN
                    )));
                }
                labels.push(label);
                pos = end;
            }
            _ => {
                return Err(DomainError::ProtocolFormat(format!(
                    "reserved label type {:#04x} at offset {}",
                    len, pos
                )));
            }
        }
    }

    if let Some(resume_at) = resume_at {
        reader.set_position(resume_at);
    }
    Name::from_labels(labels).map_err(|e| DomainError::ProtocolFormat(e.to_string()))
}
