pub mod builder;
pub mod cache_layer;
pub mod config;
pub mod core;

pub use builder::ResolverBuilder;
pub use config::ResolverConfig;
pub use self::core::IterativeResolver;
