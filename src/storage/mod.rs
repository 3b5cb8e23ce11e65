//! Storage layer for imagebatch
//!
//! This module provides artifact persistence for generated images.

/// File storage module
pub mod files;

pub use files::{ArtifactRef, ArtifactStore, FileStorage, LocalStorage, MemoryStorage};
