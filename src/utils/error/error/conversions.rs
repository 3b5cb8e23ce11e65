//! Type conversions for BatchError

use super::types::BatchError;
use crate::core::providers::unified_provider::ProviderError;

impl From<ProviderError> for BatchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration { message, .. } => BatchError::Config(message),
            other => BatchError::Provider(other),
        }
    }
}

impl From<image::ImageError> for BatchError {
    fn from(err: image::ImageError) -> Self {
        BatchError::Image(err.to_string())
    }
}
