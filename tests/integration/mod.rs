//! Integration tests for imagebatch
//!
//! These tests verify the interaction between the scheduler, the image
//! pipeline, the providers and storage.

pub mod config_tests;
pub mod pipeline_tests;
pub mod provider_tests;
pub mod scheduler_properties;
pub mod scheduler_tests;
