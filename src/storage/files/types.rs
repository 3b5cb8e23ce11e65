//! File storage types and traits

use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocalStorage, MemoryStorage};

/// Storage collaborator used by the pipeline's persist stage.
///
/// Implementations are shared across every in-flight pipeline. Callers pass a
/// distinct name per call; a store may reject a name it already holds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `content` under `name` and return a reference to the stored artifact
    async fn persist(&self, name: &str, content: &[u8]) -> Result<ArtifactRef>;

    /// Short backend label for logs
    fn backend(&self) -> &'static str;
}

/// File storage backend
#[derive(Debug, Clone)]
pub enum FileStorage {
    /// Local file system storage
    Local(LocalStorage),
    /// In-process storage, used for dry runs
    Memory(MemoryStorage),
}

/// Reference to a persisted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Generated artifact name
    pub name: String,
    /// Where the artifact lives (filesystem path or `memory://` URI)
    pub location: String,
    /// MIME content type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
