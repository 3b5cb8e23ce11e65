//! Local file system storage implementation

use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::types::{ArtifactRef, ArtifactStore};

/// Local file storage
///
/// Artifacts are written flat into `base_path`. Files are opened with
/// `create_new`, so an existing name is never overwritten.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage instance
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let path = base_path.as_ref().to_path_buf();

        // Create directory if it doesn't exist
        if !path.exists() {
            fs::create_dir_all(&path).await.map_err(|e| {
                BatchError::FileStorage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        info!("Local file storage initialized at: {}", path.display());
        Ok(Self { base_path: path })
    }

    /// Base directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Store an artifact under `name`
    pub async fn store(&self, name: &str, content: &[u8]) -> Result<ArtifactRef> {
        Self::check_name(name)?;
        let file_path = self.base_path.join(name);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    BatchError::Conflict(format!("Artifact already exists: {}", name))
                }
                _ => BatchError::FileStorage(format!("Failed to create file: {}", e)),
            })?;

        write_or_discard(&file_path, file, content).await?;

        debug!("Artifact stored: {} ({} bytes)", file_path.display(), content.len());

        Ok(ArtifactRef {
            name: name.to_string(),
            location: file_path.to_string_lossy().to_string(),
            content_type: Self::detect_content_type(name),
            size: content.len() as u64,
            checksum: Self::calculate_checksum(content),
            created_at: chrono::Utc::now(),
        })
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        if !self.base_path.exists() {
            return Err(BatchError::FileStorage(
                "Storage directory does not exist".to_string(),
            ));
        }

        // Try to write a test file
        let test_file = self.base_path.join(".health_check");
        fs::write(&test_file, b"health_check")
            .await
            .map_err(|e| BatchError::FileStorage(format!("Storage not writable: {}", e)))?;

        // Clean up test file
        let _ = fs::remove_file(&test_file).await;

        Ok(())
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return Err(BatchError::FileStorage(format!(
                "Invalid artifact name: {:?}",
                name
            )));
        }
        Ok(())
    }

    /// Detect content type from filename
    pub(crate) fn detect_content_type(filename: &str) -> String {
        match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
            Some("png") => "image/png".to_string(),
            Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
            Some("webp") => "image/webp".to_string(),
            Some("gif") => "image/gif".to_string(),
            Some("bmp") => "image/bmp".to_string(),
            Some("json") => "application/json".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }

    /// Calculate content checksum
    pub(crate) fn calculate_checksum(content: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }
}

/// Write `content` to a freshly created file. On failure the partial file at
/// `path` is removed so no truncated artifact is left next to good ones.
pub(crate) async fn write_or_discard<W>(path: &Path, mut writer: W, content: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(content).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    drop(writer);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!("Failed to remove partial artifact {}: {}", path.display(), cleanup);
        }
        return Err(BatchError::FileStorage(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

#[async_trait]
impl ArtifactStore for LocalStorage {
    async fn persist(&self, name: &str, content: &[u8]) -> Result<ArtifactRef> {
        self.store(name, content).await
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
