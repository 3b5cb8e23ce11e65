//! Error handling for imagebatch
//!
//! This module defines the crate-level error type used outside the per-item pipeline.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

pub use types::{BatchError, Result};
