//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `url`: endpoint URL checks
//! - `config_validators`: implementations for every configuration section
//! - `tests`: test suite for all validators

mod config_validators;
mod trait_def;
mod url;

pub use trait_def::Validate;
pub use url::validate_endpoint_url;
