//! Configuration validators

use super::trait_def::Validate;
use super::url::validate_endpoint_url;
use crate::config::models::*;
use crate::core::pipeline::parse_hex_color;
use tracing::debug;

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch configuration");

        if self.concurrency > 64 {
            return Err(format!(
                "Concurrency {} seems too high (>64)",
                self.concurrency
            ));
        }

        if self.name_prefix.is_empty() {
            return Err("Name prefix cannot be empty".to_string());
        }

        if !self
            .name_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "Name prefix '{}' may only contain ASCII letters, digits, '_' and '-'",
                self.name_prefix
            ));
        }

        if self.retries > 10 {
            return Err("Retries should not exceed 10".to_string());
        }

        self.canvas.validate()
    }
}

impl Validate for CanvasConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.width == 0 || self.height == 0 {
            return Err("Canvas width and height must be greater than 0".to_string());
        }

        if self.width > 8192 || self.height > 8192 {
            return Err("Canvas dimensions should not exceed 8192".to_string());
        }

        if self.inner_size == 0 {
            return Err("Canvas inner size must be greater than 0".to_string());
        }

        if self.inner_size > self.width.min(self.height) {
            return Err(format!(
                "Canvas inner size {} does not fit a {}x{} canvas",
                self.inner_size, self.width, self.height
            ));
        }

        if parse_hex_color(&self.background).is_none() {
            return Err(format!(
                "Canvas background '{}' must be #rrggbb or #rrggbbaa",
                self.background
            ));
        }

        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating provider configuration for: {}", self.name);

        if self.name.is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        if !PROVIDER_TYPES.contains(&self.provider_type.as_str()) {
            return Err(format!(
                "Unsupported provider type '{}' for provider {} (expected one of: {})",
                self.provider_type,
                self.name,
                PROVIDER_TYPES.join(", ")
            ));
        }

        if self.timeout == 0 {
            return Err(format!("Provider {} timeout must be greater than 0", self.name));
        }

        if let Some(base_url) = &self.base_url {
            validate_endpoint_url(base_url, &format!("Provider {} base URL", self.name))?;
        }

        match self.provider_type.as_str() {
            "gemini" if !self.has_api_key_source() => Err(format!(
                "Provider {} requires api_key or api_key_env",
                self.name
            )),
            "nanobanana" | "comfyui" if self.base_url.is_none() => {
                Err(format!("Provider {} requires base_url", self.name))
            }
            _ => Ok(()),
        }
    }
}

impl Validate for FileStorageConfig {
    fn validate(&self) -> Result<(), String> {
        match self.storage_type.as_str() {
            "local" => match self.local_path.as_deref() {
                Some(path) if !path.trim().is_empty() => Ok(()),
                _ => Err("Local storage requires local_path".to_string()),
            },
            "memory" => Ok(()),
            other => Err(format!("Unsupported storage type: {}", other)),
        }
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }
}
