pub mod rdata;
pub mod record;
pub mod record_type;

pub use rdata::RData;
pub use record::ResourceRecord;
pub use record_type::{RecordClass, RecordType};
