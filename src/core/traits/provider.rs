//! Describe and generate collaborator traits
//!
//! The pipeline only sees these narrow seams; every AI backend implements one
//! or both of them.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::core::pipeline::ImageItem;
use crate::core::providers::unified_provider::ProviderError;

/// Image returned by a generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Encoded image bytes
    pub bytes: Bytes,
    /// MIME type reported by the provider
    pub mime_type: String,
    /// Name of the provider that produced the image
    pub provider: String,
}

impl GeneratedImage {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            provider: provider.into(),
        }
    }
}

/// Produces a derived image from a prompt. One external call per invocation.
#[async_trait]
pub trait ImageGenerator: Send + Sync + Debug {
    /// Provider name used in logs and error reports
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;
}

/// Produces a textual description of an input image
#[async_trait]
pub trait Describer: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn describe(&self, item: &ImageItem) -> Result<String, ProviderError>;
}
