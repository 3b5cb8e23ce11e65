//! Configuration data models

pub mod batch;
pub mod file_storage;
pub mod logging;
pub mod provider;

pub use batch::*;
pub use file_storage::*;
pub use logging::*;
pub use provider::*;

/// Default number of pipelines in flight
pub fn default_concurrency() -> i64 {
    4
}

/// Default provider request timeout in seconds
pub fn default_timeout() -> u64 {
    120
}

pub fn default_true() -> bool {
    true
}
