/// 4-bit OPCODE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Opcode {
    #[default]
    Query,
    IQuery,
    Status,
    Other(u8),
}

impl Opcode {
    pub fn to_u8(&self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Other(code) => *code & 0x0F,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => Opcode::Query,
            1 => Opcode::IQuery,
            2 => Opcode::Status,
            other => Opcode::Other(other),
        }
    }
}

/// 4-bit RCODE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn to_u8(&self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => *code & 0x0F,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "OTHER",
        }
    }
}

/// Message header without the section counts.
///
/// The four counts are not stored: the encoder derives them from the section
/// lengths of the [`Message`](super::Message) so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub qr: bool,
    pub opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    /// Reserved, 3 bits.
    pub z: u8,
    pub rcode: ResponseCode,
}

impl Header {
    pub fn query(id: u16, recursion_desired: bool) -> Self {
        Self {
            id,
            rd: recursion_desired,
            ..Self::default()
        }
    }

    /// Packs the second and third header bytes.
    pub fn flags(&self) -> u16 {
        let mut flags = 0u16;
        if self.qr {
            flags |= 0x8000;
        }
        flags |= (self.opcode.to_u8() as u16) << 11;
        if self.aa {
            flags |= 0x0400;
        }
        if self.tc {
            flags |= 0x0200;
        }
        if self.rd {
            flags |= 0x0100;
        }
        if self.ra {
            flags |= 0x0080;
        }
        flags |= ((self.z & 0x07) as u16) << 4;
        flags | self.rcode.to_u8() as u16
    }

    pub fn from_flags(id: u16, flags: u16) -> Self {
        Self {
            id,
            qr: flags & 0x8000 != 0,
            opcode: Opcode::from_u8(((flags >> 11) & 0x0F) as u8),
            aa: flags & 0x0400 != 0,
            tc: flags & 0x0200 != 0,
            rd: flags & 0x0100 != 0,
            ra: flags & 0x0080 != 0,
            z: ((flags >> 4) & 0x07) as u8,
            rcode: ResponseCode::from_u8((flags & 0x0F) as u8),
        }
    }
}
