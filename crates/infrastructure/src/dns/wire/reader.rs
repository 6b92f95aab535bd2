use iterdns_domain::DomainError;

/// Cursor over a complete DNS message.
///
/// Keeps the whole buffer reachable so compression pointers can jump
/// backwards into it.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_u8(&mut self, field: &str) -> Result<u8, DomainError> {
        Ok(self.read_bytes(1, field)?[0])
    }

    pub fn read_u16(&mut self, field: &str) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2, field)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self, field: &str) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4, field)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_bytes(&mut self, len: usize, field: &str) -> Result<&'a [u8], DomainError> {
        if self.remaining() < len {
            return Err(DomainError::ProtocolFormat(format!(
                "message ends inside {} at offset {}",
                field, self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}
