//! Core traits module
//!
//! Contains the collaborator interfaces of the image pipeline

pub mod error_mapper;
pub mod provider;

pub use error_mapper::*;
pub use provider::*;
