//! Core error type definitions

use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for imagebatch
pub type Result<T> = std::result::Result<T, BatchError>;

/// Main error type for imagebatch
#[derive(Error, Debug)]
pub enum BatchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Provider errors
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(String),

    /// File storage errors
    #[error("File storage error: {0}")]
    FileStorage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
