#![allow(dead_code)]
mod builders;
mod mock_repositories;

pub use builders::*;
pub use mock_repositories::*;
