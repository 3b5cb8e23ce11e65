//! Pipeline assembly

use super::image_pipeline::ImagePipeline;
use super::naming::ArtifactNamer;
use super::postprocess::{CanvasNormalizer, Passthrough, PostProcessor};
use super::prompt::PromptRotation;
use crate::config::{BatchConfig, Config};
use crate::core::providers::{build_generator_chain, create_describer};
use crate::core::traits::{Describer, ImageGenerator};
use crate::storage::ArtifactStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// Builder for [`ImagePipeline`]
///
/// Only the generator and the store are required. Defaults: no describer,
/// the built-in prompt, the 1600x1600 canvas normalizer and the `NB_PRO`
/// name prefix.
pub struct ImagePipelineBuilder {
    generator: Arc<dyn ImageGenerator>,
    store: Arc<dyn ArtifactStore>,
    describer: Option<Arc<dyn Describer>>,
    fallback_description: Option<String>,
    prompts: PromptRotation,
    post_processor: Arc<dyn PostProcessor>,
    namer: ArtifactNamer,
}

impl ImagePipelineBuilder {
    pub fn new(generator: Arc<dyn ImageGenerator>, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            generator,
            store,
            describer: None,
            fallback_description: None,
            prompts: PromptRotation::default(),
            post_processor: Arc::new(CanvasNormalizer::default()),
            namer: ArtifactNamer::default(),
        }
    }

    pub fn describer(mut self, describer: Arc<dyn Describer>) -> Self {
        self.describer = Some(describer);
        self
    }

    /// Used in place of a failed describe instead of failing the item
    pub fn fallback_description(mut self, description: impl Into<String>) -> Self {
        self.fallback_description = Some(description.into());
        self
    }

    pub fn prompts(mut self, prompts: PromptRotation) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn post_processor(mut self, post_processor: Arc<dyn PostProcessor>) -> Self {
        self.post_processor = post_processor;
        self
    }

    pub fn namer(mut self, namer: ArtifactNamer) -> Self {
        self.namer = namer;
        self
    }

    /// Apply the prompt, naming, fallback and canvas settings of a batch config
    pub fn with_batch_config(mut self, config: &BatchConfig) -> Result<Self> {
        self.prompts = PromptRotation::new(config.prompts.iter().cloned());
        self.namer = ArtifactNamer::new(config.name_prefix.clone());
        self.fallback_description = config.fallback_description.clone();
        self.post_processor = if config.canvas.enabled {
            Arc::new(CanvasNormalizer::from_config(&config.canvas)?)
        } else {
            Arc::new(Passthrough)
        };
        Ok(self)
    }

    pub fn build(self) -> ImagePipeline {
        ImagePipeline {
            describer: self.describer,
            fallback_description: self.fallback_description,
            generator: self.generator,
            prompts: self.prompts,
            post_processor: self.post_processor,
            store: self.store,
            namer: Arc::new(self.namer),
        }
    }
}

impl ImagePipeline {
    pub fn builder(
        generator: Arc<dyn ImageGenerator>,
        store: Arc<dyn ArtifactStore>,
    ) -> ImagePipelineBuilder {
        ImagePipelineBuilder::new(generator, store)
    }

    /// Assemble the generator chain, optional describer and batch settings
    pub fn from_config(config: &Config, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        let chain = build_generator_chain(config.enabled_providers())?;
        let mut builder = Self::builder(Arc::new(chain), store).with_batch_config(&config.batch)?;

        if let Some(describer) = config.active_describer() {
            builder = builder.describer(create_describer(describer)?);
        }

        Ok(builder.build())
    }
}
