use crate::dns_record::{RecordClass, RecordType};
use crate::name::Name;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: Name,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(name: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    /// An IN-class address query, the only kind the resolver issues.
    pub fn a(name: Name) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}
