//! Error mapping
//!
//! Maps upstream HTTP failures onto [`ProviderError`].

use crate::core::providers::unified_provider::ProviderError;

/// Maps a non-success HTTP response to a provider error
///
/// ```rust,ignore
/// struct ComfyUiErrorMapper;
///
/// impl ErrorMapper for ComfyUiErrorMapper {
///     fn map_http_error(&self, status: u16, body: &str) -> ProviderError {
///         ProviderError::from_http_status("comfyui", status, body)
///     }
/// }
/// ```
pub trait ErrorMapper: Send + Sync + 'static {
    fn map_http_error(&self, status_code: u16, response_body: &str) -> ProviderError;

    /// Map a JSON error body; defaults to the HTTP mapping of its text
    fn map_json_error(&self, status_code: u16, body: &serde_json::Value) -> ProviderError {
        self.map_http_error(status_code, &body.to_string())
    }
}
