//! Provider configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Provider kinds the factory can build
pub const PROVIDER_TYPES: &[&str] = &["gemini", "nanobanana", "comfyui", "mock"];

/// One describe or generate collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name used in logs
    pub name: String,
    /// Provider type (gemini, nanobanana, comfyui, mock)
    pub provider_type: String,
    /// Inline API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Endpoint base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model identifier
    #[serde(default)]
    pub model: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Requested output width, for endpoints that take one
    #[serde(default)]
    pub width: Option<u32>,
    /// Requested output height, for endpoints that take one
    #[serde(default)]
    pub height: Option<u32>,
    /// Disabled providers are left out of the chain
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider_type: String::new(),
            api_key: None,
            api_key_env: None,
            base_url: None,
            model: None,
            timeout: default_timeout(),
            width: None,
            height: None,
            enabled: true,
        }
    }
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, provider_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_type: provider_type.into(),
            ..Default::default()
        }
    }

    /// Inline key first, then the named environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| {
                self.api_key_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|key| !key.is_empty())
            })
    }

    /// Whether an API key source is configured at all
    pub fn has_api_key_source(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty()) || self.api_key_env.is_some()
    }
}
