//! # imagebatch
//!
//! Bounded-concurrency batch image pipeline. Each input image is optionally
//! described, turned into a new image by an AI generator, normalized onto a
//! fixed canvas and persisted, with at most `concurrency` items in flight.
//!
//! ## Features
//!
//! - **Bounded concurrency**: FIFO queue with a fixed number of pipeline slots
//! - **Cooperative cancellation**: one token per run, checked at every stage
//! - **Progress events**: one event per settled item plus a terminal summary
//! - **Provider chain**: Gemini, NanoBanana and ComfyUI backends tried in order
//! - **Canvas normalization**: fit-inside resize centered on a solid background
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imagebatch::{BatchRunner, Config, TracingSink, collect_images};
//! use std::path::PathBuf;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/imagebatch.yaml").await?;
//!     let runner = BatchRunner::new(config).await?;
//!
//!     let items = collect_images(&[PathBuf::from("input")]).await?;
//!     let report = runner.run(items, &TracingSink, &CancellationToken::new()).await?;
//!
//!     println!("{:?}: {} artifact(s)", report.status(), report.artifacts().count());
//!     Ok(())
//! }
//! ```
//!
//! ## Library Mode
//!
//! The scheduler is generic over the item type; any [`ItemPipeline`] can be run.
//!
//! ```rust,no_run
//! use imagebatch::{ItemOutcome, PipelineContext, pipeline_fn, start_batch};
//! use std::sync::Arc;
//!
//! # async fn demo() -> imagebatch::Result<()> {
//! let pipeline = Arc::new(pipeline_fn(|_n: u32, _ctx: PipelineContext| async move {
//!     ItemOutcome::Cancelled
//! }));
//! let summary = start_batch(&[1u32, 2, 3], 2, pipeline).wait().await?;
//! assert_eq!(summary.processed, 3);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{BatchError, Result};

pub use core::batch::{
    BatchEvent, BatchHandle, BatchItem, BatchProgress, BatchRun, BatchScheduler, BatchStatus,
    BatchSummary, CollectingSink, ItemOutcome, ItemPipeline, NoopSink, PipelineContext,
    ProgressSink, TracingSink, pipeline_fn, start_batch,
};
pub use core::pipeline::{ImageItem, ImagePipeline, ImagePipelineBuilder, PipelineError, collect_images};
pub use core::providers::ProviderError;
pub use core::traits::{Describer, GeneratedImage, ImageGenerator};
pub use core::{BatchReport, BatchRunner};
pub use storage::{ArtifactRef, ArtifactStore, FileStorage};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
