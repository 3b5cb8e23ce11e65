//! Gemini configuration

use serde::{Deserialize, Serialize};

use super::error::gemini_config_error;
use crate::config::ProviderConfig;
use crate::core::providers::unified_provider::ProviderError;

/// Default image model
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
/// Default describe model
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (Google AI Studio)
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    /// Model used for image generation
    pub image_model: String,
    /// Model used for describing input images
    pub text_model: String,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Log request and response bodies at debug level
    pub debug: bool,
}

impl GeminiConfig {
    pub fn new_google_ai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: "v1beta".to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            request_timeout: 120,
            connect_timeout: 10,
            debug: false,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
            if let Ok(api_key) = std::env::var(var) {
                if !api_key.is_empty() {
                    return Ok(Self::new_google_ai(api_key));
                }
            }
        }

        Err(gemini_config_error(
            "No valid Gemini configuration found in environment variables",
        ))
    }

    /// Build from a provider entry. `model` overrides both models, which suits
    /// entries that only generate or only describe.
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            gemini_config_error(format!(
                "No API key for provider {} (set api_key or the variable named by api_key_env)",
                config.name
            ))
        })?;

        let mut gemini = Self::new_google_ai(api_key);
        gemini.request_timeout = config.timeout;
        gemini.connect_timeout = gemini.connect_timeout.min(config.timeout);
        if let Some(base_url) = &config.base_url {
            gemini.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &config.model {
            gemini.image_model = model.clone();
            gemini.text_model = model.clone();
        }

        gemini.validate()?;
        Ok(gemini)
    }

    /// `{base}/{version}/models/{model}:{operation}`
    pub fn get_endpoint(&self, model: &str, operation: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url, self.api_version, model, operation
        )
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.api_key.is_empty() {
            return Err(gemini_config_error("API key is required for Google AI Studio"));
        }

        if self.request_timeout == 0 {
            return Err(gemini_config_error("Request timeout must be greater than 0"));
        }

        if self.connect_timeout == 0 || self.connect_timeout > self.request_timeout {
            return Err(gemini_config_error(
                "Connect timeout must be between 1 and the request timeout",
            ));
        }

        if self.image_model.is_empty() || self.text_model.is_empty() {
            return Err(gemini_config_error("Model name cannot be empty"));
        }

        Ok(())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new_google_ai("")
    }
}

/// Builder for [`GeminiConfig`]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    pub fn google_ai(api_key: impl Into<String>) -> Self {
        Self {
            config: GeminiConfig::new_google_ai(api_key),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.config.text_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.request_timeout = timeout_secs;
        self.config.connect_timeout = self.config.connect_timeout.min(timeout_secs);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Result<GeminiConfig, ProviderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
