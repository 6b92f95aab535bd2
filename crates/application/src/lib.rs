//! iterdns application layer: ports implemented by the infrastructure crate
//! and the use cases that drive them.
pub mod ports;
pub mod services;
pub mod use_cases;
