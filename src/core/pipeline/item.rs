//! Input images

use crate::core::batch::BatchItem;
use crate::storage::LocalStorage;
use crate::utils::error::{BatchError, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Extensions accepted as input images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// One input image. Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    id: String,
    file_name: String,
    mime_type: String,
    bytes: Bytes,
}

impl ImageItem {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let bytes = bytes.into();
        Self {
            id: id.into(),
            mime_type: sniff_mime_type(&bytes, &file_name),
            file_name,
            bytes,
        }
    }

    /// Read an image from disk; the path is the item's identity
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).await.map_err(|e| {
            BatchError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::new(path.display().to_string(), file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl BatchItem for ImageItem {
    fn id(&self) -> String {
        self.id.clone()
    }
}

/// MIME type from the image header, falling back to the file extension
fn sniff_mime_type(bytes: &[u8], file_name: &str) -> String {
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => LocalStorage::detect_content_type(&file_name.to_lowercase()),
    }
}

/// Whether the path has an accepted image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load images from files and directories.
///
/// Directories are read one level deep and their entries sorted by name, so the
/// queue order is deterministic. Non-image files are skipped.
pub async fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageItem>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path).await.map_err(|e| {
            BatchError::not_found(format!("Input {} is not accessible: {}", path.display(), e))
        })?;

        if metadata.is_dir() {
            let mut entries = fs::read_dir(path).await?;
            let mut dir_files = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                if entry.file_type().await?.is_file() && is_image_path(&entry_path) {
                    dir_files.push(entry_path);
                }
            }
            dir_files.sort();
            debug!("Found {} image(s) in {}", dir_files.len(), path.display());
            files.extend(dir_files);
        } else if is_image_path(path) {
            files.push(path.clone());
        } else {
            warn!("Skipping non-image input: {}", path.display());
        }
    }

    let mut items = Vec::with_capacity(files.len());
    for file in files {
        items.push(ImageItem::from_path(&file).await?);
    }
    Ok(items)
}
