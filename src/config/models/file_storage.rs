//! File storage configuration

use serde::{Deserialize, Serialize};

/// Where artifacts are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Storage type (local, memory)
    pub storage_type: String,
    /// Output directory for local storage
    pub local_path: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "local".to_string(),
            local_path: Some("./output".to_string()),
        }
    }
}
