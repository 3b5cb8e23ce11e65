//! FileStorage enum implementation with dispatch methods

use crate::config::FileStorageConfig;
use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;
use tracing::info;

use super::local::LocalStorage;
use super::memory::MemoryStorage;
use super::types::{ArtifactRef, ArtifactStore, FileStorage};

impl FileStorage {
    /// Create a new file storage instance
    pub async fn new(config: &FileStorageConfig) -> Result<Self> {
        info!("Initializing file storage: {}", config.storage_type);

        match config.storage_type.as_str() {
            "local" => {
                let path = config
                    .local_path
                    .as_ref()
                    .ok_or_else(|| BatchError::Config("Local path not specified".to_string()))?;
                Ok(FileStorage::Local(LocalStorage::new(path).await?))
            }
            "memory" => Ok(FileStorage::Memory(MemoryStorage::new())),
            _ => Err(BatchError::Config(format!(
                "Unsupported storage type: {}",
                config.storage_type
            ))),
        }
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        match self {
            FileStorage::Local(storage) => storage.health_check().await,
            FileStorage::Memory(_) => Ok(()),
        }
    }
}

#[async_trait]
impl ArtifactStore for FileStorage {
    async fn persist(&self, name: &str, content: &[u8]) -> Result<ArtifactRef> {
        match self {
            FileStorage::Local(storage) => storage.store(name, content).await,
            FileStorage::Memory(storage) => storage.store(name, content),
        }
    }

    fn backend(&self) -> &'static str {
        match self {
            FileStorage::Local(storage) => storage.backend(),
            FileStorage::Memory(storage) => storage.backend(),
        }
    }
}
