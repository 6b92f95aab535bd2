use super::{Header, Question, ResponseCode};
use crate::dns_record::ResourceRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn query(id: u16, question: Question, recursion_desired: bool) -> Self {
        Self {
            header: Header::query(id, recursion_desired),
            questions: vec![question],
            ..Self::default()
        }
    }

    /// Skeleton response for `request`: same id, opcode, RD bit and question
    /// list, with QR and RA set. Sections start empty.
    pub fn response_to(request: &Message) -> Self {
        Self {
            header: Header {
                id: request.header.id,
                qr: true,
                opcode: request.header.opcode,
                rd: request.header.rd,
                ra: true,
                ..Header::default()
            },
            questions: request.questions.clone(),
            ..Self::default()
        }
    }

    pub fn with_rcode(mut self, rcode: ResponseCode) -> Self {
        self.header.rcode = rcode;
        self
    }

    /// QDCOUNT, ANCOUNT, NSCOUNT, ARCOUNT as they go on the wire.
    ///
    /// # Panics
    ///
    /// When a section holds more than `u16::MAX` entries; no valid message can.
    pub fn counts(&self) -> [u16; 4] {
        [
            self.questions.len(),
            self.answers.len(),
            self.authorities.len(),
            self.additionals.len(),
        ]
        .map(|len| u16::try_from(len).expect("DNS section exceeds 65535 entries"))
    }

    pub fn all_records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }
}
