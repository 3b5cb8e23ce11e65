//! Ordered generator fallback
//!
//! Each generator is tried once, in order. The first success wins; when every
//! generator fails the error lists what was attempted.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::unified_provider::ProviderError;
use crate::core::traits::{GeneratedImage, ImageGenerator};

#[derive(Debug, Clone)]
pub struct GeneratorChain {
    generators: Vec<Arc<dyn ImageGenerator>>,
}

impl GeneratorChain {
    pub fn new(generators: Vec<Arc<dyn ImageGenerator>>) -> Result<Self, ProviderError> {
        if generators.is_empty() {
            return Err(ProviderError::configuration(
                "chain",
                "At least one image generator is required",
            ));
        }
        Ok(Self { generators })
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.generators.iter().map(|g| g.name().to_string()).collect()
    }
}

#[async_trait]
impl ImageGenerator for GeneratorChain {
    fn name(&self) -> &str {
        match self.generators.as_slice() {
            [only] => only.name(),
            _ => "chain",
        }
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let mut attempted = Vec::with_capacity(self.generators.len());
        let mut last_error = None;

        for (idx, generator) in self.generators.iter().enumerate() {
            match generator.generate(prompt).await {
                Ok(image) => {
                    if idx > 0 {
                        info!(
                            "Fallback generator {} succeeded after {} failure(s)",
                            generator.name(),
                            idx
                        );
                    }
                    return Ok(image);
                }
                Err(err) => {
                    warn!("Generator {} failed: {}", generator.name(), err);
                    attempted.push(generator.name().to_string());
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if attempted.len() == 1 => Err(err),
            Some(err) => Err(ProviderError::routing_error(
                "chain",
                attempted,
                err.to_string(),
            )),
            None => Err(ProviderError::configuration(
                "chain",
                "At least one image generator is required",
            )),
        }
    }
}
