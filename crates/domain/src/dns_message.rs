pub mod header;
pub mod message;
pub mod question;

pub use header::{Header, Opcode, ResponseCode};
pub use message::Message;
pub use question::Question;
