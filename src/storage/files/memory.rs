//! In-memory artifact storage

use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::local::LocalStorage;
use super::types::{ArtifactRef, ArtifactStore};

/// Stores artifacts in a shared map. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }

    /// Stored names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn store(&self, name: &str, content: &[u8]) -> Result<ArtifactRef> {
        let mut artifacts = self.artifacts.write();
        if artifacts.contains_key(name) {
            return Err(BatchError::Conflict(format!(
                "Artifact already exists: {}",
                name
            )));
        }
        artifacts.insert(name.to_string(), content.to_vec());

        Ok(ArtifactRef {
            name: name.to_string(),
            location: format!("memory://{}", name),
            content_type: LocalStorage::detect_content_type(name),
            size: content.len() as u64,
            checksum: LocalStorage::calculate_checksum(content),
            created_at: chrono::Utc::now(),
        })
    }
}

#[async_trait]
impl ArtifactStore for MemoryStorage {
    async fn persist(&self, name: &str, content: &[u8]) -> Result<ArtifactRef> {
        self.store(name, content)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
