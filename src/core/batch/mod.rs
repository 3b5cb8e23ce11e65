//! Bounded-concurrency batch processing
//!
//! A [`BatchScheduler`] pulls items from a FIFO queue and keeps at most
//! `limit` pipelines in flight. Every settled pipeline produces a
//! [`BatchEvent::Progress`]; the run ends with exactly one
//! [`BatchEvent::Finished`] carrying the aggregate [`BatchSummary`].

mod scheduler;
mod sink;
mod state;
mod traits;
mod types;


// Re-export all public types
pub use scheduler::{BatchHandle, BatchRun, BatchScheduler, start_batch};
pub use sink::{CollectingSink, NoopSink, ProgressSink, TracingSink};
pub use state::{Launch, RunState, normalize_limit};
pub use traits::{FnPipeline, ItemPipeline, pipeline_fn};
pub use types::{
    BatchEvent, BatchItem, BatchProgress, BatchStatus, BatchSummary, ItemFailure, ItemOutcome,
    ItemReport, PipelineContext,
};
