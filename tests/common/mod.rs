//! Common test utilities for imagebatch
//!
//! - Image fixtures and offline configurations
//! - Scripted collaborators for the pipeline seams
//! - Assertion macros
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, providers};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let item = fixtures::ImageFactory::item("a.png");
//!     let generator = providers::ScriptedGenerator::succeeding("stub");
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod providers;

// Re-export commonly used items
pub use fixtures::{ImageFactory, offline_config};
pub use providers::{FlakyGenerator, ScriptedGenerator};

/// Skip test if environment variable is not set
#[macro_export]
macro_rules! skip_without_env {
    ($var:expr) => {
        if std::env::var($var).is_err() {
            eprintln!("Skipping test: {} environment variable not set", $var);
            return;
        }
    };
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
