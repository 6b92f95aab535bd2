//! iterdns domain layer
pub mod config;
pub mod dns_message;
pub mod dns_record;
pub mod errors;
pub mod name;
pub mod resolution;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{Header, Message, Opcode, Question, ResponseCode};
pub use dns_record::{RData, RecordClass, RecordType, ResourceRecord};
pub use errors::DomainError;
pub use name::Name;
pub use resolution::Resolution;
pub use zone::{Zone, ZoneAnswer};
