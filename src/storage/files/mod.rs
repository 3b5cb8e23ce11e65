//! File storage implementation
//!
//! This module provides artifact storage with support for the local filesystem and memory.

mod local;
mod memory;
mod storage;
mod types;

// Re-export public types
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use types::{ArtifactRef, ArtifactStore, FileStorage};

#[cfg(test)]
pub use types::MockArtifactStore;
