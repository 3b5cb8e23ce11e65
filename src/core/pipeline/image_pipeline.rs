//! Describe → generate → post-process → persist for one image

use super::error::PipelineError;
use super::item::ImageItem;
use super::naming::ArtifactNamer;
use super::postprocess::PostProcessor;
use super::prompt::PromptRotation;
use crate::core::batch::{BatchItem, ItemOutcome, ItemPipeline, PipelineContext};
use crate::core::traits::{Describer, ImageGenerator};
use crate::storage::{ArtifactRef, ArtifactStore};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Why a pipeline run stopped before persisting
#[derive(Debug)]
enum Interrupt {
    Cancelled,
    Failed(PipelineError),
}

impl From<PipelineError> for Interrupt {
    fn from(err: PipelineError) -> Self {
        Interrupt::Failed(err)
    }
}

/// Image pipeline run once per batch item.
///
/// Cancellation is checked before every stage, and the network stages are
/// raced against the token so an in-flight request is abandoned promptly.
/// Persist is never interrupted once started.
pub struct ImagePipeline {
    pub(super) describer: Option<Arc<dyn Describer>>,
    pub(super) fallback_description: Option<String>,
    pub(super) generator: Arc<dyn ImageGenerator>,
    pub(super) prompts: PromptRotation,
    pub(super) post_processor: Arc<dyn PostProcessor>,
    pub(super) store: Arc<dyn ArtifactStore>,
    pub(super) namer: Arc<ArtifactNamer>,
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("describer", &self.describer.as_ref().map(|d| d.name().to_string()))
            .field("generator", &self.generator.name())
            .field("prompts", &self.prompts.len())
            .field("store", &self.store.backend())
            .field("name_prefix", &self.namer.prefix())
            .finish()
    }
}

impl ImagePipeline {
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn has_describer(&self) -> bool {
        self.describer.is_some()
    }

    pub fn prompts(&self) -> &PromptRotation {
        &self.prompts
    }

    async fn process(&self, item: &ImageItem, ctx: &PipelineContext) -> Result<ArtifactRef, Interrupt> {
        let token = &ctx.cancellation;

        checkpoint(token)?;
        let description = self.describe(item, token).await?;

        checkpoint(token)?;
        let prompt = self
            .prompts
            .build_prompt(ctx.processed_at_start, description.as_deref());
        debug!(item = %item.id(), "Generating with {}", self.generator.name());
        let generated = cancellable(token, self.generator.generate(&prompt))
            .await?
            .map_err(|e| PipelineError::generate(e.to_string()))?;

        checkpoint(token)?;
        let post_processor = self.post_processor.clone();
        let processed = tokio::task::spawn_blocking(move || post_processor.process(&generated))
            .await
            .map_err(|e| PipelineError::post_process(format!("post-process task failed: {}", e)))??;

        checkpoint(token)?;
        let name = self.namer.next(processed.extension);
        let artifact = self
            .store
            .persist(&name, &processed.bytes)
            .await
            .map_err(|e| PipelineError::persist(e.to_string()))?;

        debug!(item = %item.id(), "Persisted {} ({} bytes)", artifact.location, artifact.size);
        Ok(artifact)
    }

    async fn describe(
        &self,
        item: &ImageItem,
        token: &CancellationToken,
    ) -> Result<Option<String>, Interrupt> {
        let Some(describer) = &self.describer else {
            return Ok(None);
        };

        let failure = match cancellable(token, describer.describe(item)).await? {
            Ok(text) if !text.trim().is_empty() => return Ok(Some(text)),
            Ok(_) => format!("{} returned an empty description", describer.name()),
            Err(e) => e.to_string(),
        };

        match &self.fallback_description {
            Some(fallback) => {
                warn!(
                    "Describe failed for {}, using fallback description: {}",
                    item.id(),
                    failure
                );
                Ok(Some(fallback.clone()))
            }
            None => Err(Interrupt::Failed(PipelineError::describe(failure))),
        }
    }
}

#[async_trait]
impl ItemPipeline<ImageItem> for ImagePipeline {
    async fn run(&self, item: ImageItem, ctx: PipelineContext) -> ItemOutcome {
        match self.process(&item, &ctx).await {
            Ok(artifact) => ItemOutcome::Persisted(artifact),
            Err(Interrupt::Cancelled) => ItemOutcome::Cancelled,
            Err(Interrupt::Failed(err)) => ItemOutcome::Failed(err),
        }
    }
}

fn checkpoint(token: &CancellationToken) -> Result<(), Interrupt> {
    if token.is_cancelled() {
        Err(Interrupt::Cancelled)
    } else {
        Ok(())
    }
}

async fn cancellable<F: Future>(token: &CancellationToken, fut: F) -> Result<F::Output, Interrupt> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Interrupt::Cancelled),
        output = fut => Ok(output),
    }
}
