//! Configuration management for imagebatch
//!
//! This module handles loading, validation and serialization of the run
//! configuration. YAML files and `IMAGEBATCH_*` environment variables are both
//! supported; CLI flags are applied on top by the binary.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "IMAGEBATCH_";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scheduler and pipeline settings
    #[serde(default)]
    pub batch: BatchConfig,
    /// Ordered generator chain; the first success wins
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Describe collaborator, used when `batch.describe` is set
    #[serde(default)]
    pub describer: Option<ProviderConfig>,
    /// Artifact storage
    #[serde(default)]
    pub storage: FileStorageConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BatchError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| BatchError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a configuration from a variable lookup.
    ///
    /// Recognized keys (all prefixed with `IMAGEBATCH_`): `CONCURRENCY`,
    /// `PROMPTS` (`|`-separated), `DESCRIBE`, `FALLBACK_DESCRIPTION`,
    /// `NAME_PREFIX`, `RETRIES`, `PROVIDER`, `MODEL`, `BASE_URL`, `API_KEY`,
    /// `OUTPUT_DIR`, `LOG_LEVEL`, `LOG_FORMAT`. Without `API_KEY` the provider
    /// reads `GEMINI_API_KEY`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut config = Self::default();

        if let Some(value) = var("CONCURRENCY") {
            config.batch.concurrency = parse_var("CONCURRENCY", &value)?;
        }
        if let Some(value) = var("PROMPTS") {
            config.batch.prompts = value.split('|').map(str::to_string).collect();
        }
        if let Some(value) = var("DESCRIBE") {
            config.batch.describe = parse_var("DESCRIBE", &value)?;
        }
        if let Some(value) = var("FALLBACK_DESCRIPTION") {
            config.batch.fallback_description = Some(value);
        }
        if let Some(value) = var("NAME_PREFIX") {
            config.batch.name_prefix = value;
        }
        if let Some(value) = var("RETRIES") {
            config.batch.retries = parse_var("RETRIES", &value)?;
        }

        let provider_type = var("PROVIDER").unwrap_or_else(|| "gemini".to_string());
        let mut provider = ProviderConfig::new(provider_type.clone(), provider_type);
        provider.model = var("MODEL");
        provider.base_url = var("BASE_URL");
        provider.api_key = var("API_KEY");
        if provider.api_key.is_none() && provider.provider_type == "gemini" {
            provider.api_key_env = Some("GEMINI_API_KEY".to_string());
        }
        if config.batch.describe {
            config.describer = Some(provider.clone());
        }
        config.providers.push(provider);

        if let Some(value) = var("OUTPUT_DIR") {
            config.storage.local_path = Some(value);
        }
        if let Some(value) = var("LOG_LEVEL") {
            config.logging.level = value;
        }
        if let Some(value) = var("LOG_FORMAT") {
            config.logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(BatchError::config(format!(
                        "Invalid {}LOG_FORMAT: {}",
                        ENV_PREFIX, other
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Generators that take part in the chain, in order
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Describer to use, if the describe stage is on
    pub fn active_describer(&self) -> Option<&ProviderConfig> {
        if self.batch.describe {
            self.describer.as_ref().filter(|d| d.enabled)
        } else {
            None
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.batch
            .validate()
            .map_err(|e| BatchError::Config(format!("Batch config error: {}", e)))?;

        if self.enabled_providers().next().is_none() {
            return Err(BatchError::Config(
                "At least one enabled provider must be configured".to_string(),
            ));
        }

        let mut provider_names = HashSet::new();
        for provider in &self.providers {
            if !provider_names.insert(&provider.name) {
                return Err(BatchError::Config(format!(
                    "Duplicate provider name: {}",
                    provider.name
                )));
            }
            provider
                .validate()
                .map_err(|e| BatchError::Config(format!("Provider config error: {}", e)))?;
        }

        match &self.describer {
            Some(describer) => {
                describer
                    .validate()
                    .map_err(|e| BatchError::Config(format!("Describer config error: {}", e)))?;
                if !matches!(describer.provider_type.as_str(), "gemini" | "mock") {
                    return Err(BatchError::Config(format!(
                        "Describer config error: provider type '{}' cannot describe images",
                        describer.provider_type
                    )));
                }
            }
            None if self.batch.describe => {
                return Err(BatchError::Config(
                    "Describe is enabled but no describer is configured".to_string(),
                ));
            }
            None => {}
        }

        self.storage
            .validate()
            .map_err(|e| BatchError::Config(format!("Storage config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| BatchError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BatchError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        BatchError::Config(format!("Invalid {}{} '{}': {}", ENV_PREFIX, name, value, e))
    })
}
