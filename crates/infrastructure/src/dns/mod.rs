pub mod cache;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod wire;
pub mod zone_file;

pub use cache::{Clock, ManualClock, RecordCache, SystemClock};
pub use resolver::{IterativeResolver, ResolverBuilder, ResolverConfig};
pub use server::DnsServerHandler;
pub use transport::{udp::UdpTransport, DnsTransport};
pub use zone_file::{load_zone, parse_master_file};
