//! Error handling utilities
//!
//! This module provides the crate-wide error type and its helper constructors.

pub mod error;

// Re-export commonly used types
pub use error::*;
