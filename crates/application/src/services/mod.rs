pub mod cname_chase;

pub use cname_chase::{chase_cached, CachedChain};
