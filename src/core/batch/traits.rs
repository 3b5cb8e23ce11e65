//! Pipeline seam of the scheduler

use super::types::{ItemOutcome, PipelineContext};
use async_trait::async_trait;
use std::future::Future;

/// Per-item pipeline run by the scheduler.
///
/// Implementations must settle every call with an [`ItemOutcome`]; failures
/// are values, never panics. A pipeline that observes
/// `ctx.cancellation` should return [`ItemOutcome::Cancelled`].
#[async_trait]
pub trait ItemPipeline<I>: Send + Sync {
    async fn run(&self, item: I, ctx: PipelineContext) -> ItemOutcome;
}

/// Adapts an async closure into an [`ItemPipeline`]
pub struct FnPipeline<F> {
    f: F,
}

/// Wrap `f` as a pipeline
///
/// # Example
/// ```rust,ignore
/// let pipeline = Arc::new(pipeline_fn(|n: usize, _ctx: PipelineContext| async move {
///     if n % 2 == 0 {
///         ItemOutcome::Cancelled
///     } else {
///         ItemOutcome::Failed(PipelineError::generate("odd"))
///     }
/// }));
/// ```
pub fn pipeline_fn<F>(f: F) -> FnPipeline<F> {
    FnPipeline { f }
}

#[async_trait]
impl<I, F, Fut> ItemPipeline<I> for FnPipeline<F>
where
    I: Send + 'static,
    F: Fn(I, PipelineContext) -> Fut + Send + Sync,
    Fut: Future<Output = ItemOutcome> + Send + 'static,
{
    async fn run(&self, item: I, ctx: PipelineContext) -> ItemOutcome {
        (self.f)(item, ctx).await
    }
}
