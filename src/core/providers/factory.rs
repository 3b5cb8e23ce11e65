//! Provider construction from configuration

use std::sync::Arc;
use tracing::info;

use super::chain::GeneratorChain;
use super::gemini::{GeminiConfig, GeminiProvider};
use super::http_image::{DEFAULT_HEIGHT, DEFAULT_WIDTH, HttpImageProvider};
use super::mock::{MockDescriber, MockImageProvider};
use super::unified_provider::ProviderError;
use crate::config::ProviderConfig;
use crate::core::traits::{Describer, ImageGenerator};

/// Build one image generator
pub fn create_generator(config: &ProviderConfig) -> Result<Arc<dyn ImageGenerator>, ProviderError> {
    match config.provider_type.as_str() {
        "gemini" => {
            let gemini = GeminiConfig::from_provider_config(config)?;
            Ok(Arc::new(GeminiProvider::new(gemini)?))
        }
        "nanobanana" | "comfyui" => Ok(Arc::new(HttpImageProvider::from_provider_config(config)?)),
        "mock" => Ok(Arc::new(MockImageProvider::new(
            config.width.unwrap_or(DEFAULT_WIDTH),
            config.height.unwrap_or(DEFAULT_HEIGHT),
        ))),
        other => Err(ProviderError::configuration(
            "factory",
            format!("Unsupported provider type: {}", other),
        )),
    }
}

/// Build a describer; only Gemini and the mock can describe images
pub fn create_describer(config: &ProviderConfig) -> Result<Arc<dyn Describer>, ProviderError> {
    match config.provider_type.as_str() {
        "gemini" => {
            let gemini = GeminiConfig::from_provider_config(config)?;
            Ok(Arc::new(GeminiProvider::new(gemini)?))
        }
        "mock" => Ok(Arc::new(MockDescriber::default())),
        other => Err(ProviderError::configuration(
            "factory",
            format!("Provider type '{}' cannot describe images", other),
        )),
    }
}

/// Build the ordered chain from the enabled providers
pub fn build_generator_chain<'a, I>(providers: I) -> Result<GeneratorChain, ProviderError>
where
    I: IntoIterator<Item = &'a ProviderConfig>,
{
    let generators = providers
        .into_iter()
        .filter(|p| p.enabled)
        .map(create_generator)
        .collect::<Result<Vec<_>, _>>()?;

    let chain = GeneratorChain::new(generators)?;
    info!("Generator chain: {}", chain.names().join(" -> "));
    Ok(chain)
}
