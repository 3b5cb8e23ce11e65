//! Core functionality for imagebatch
//!
//! This module contains the scheduler, the per-item pipeline and the provider
//! collaborators, plus [`BatchRunner`] which wires them together from a
//! [`Config`].

pub mod batch;
pub mod pipeline;
pub mod providers;
pub mod traits;

use crate::config::Config;
use crate::core::batch::{BatchItem, BatchRun, BatchScheduler, BatchStatus, BatchSummary, ProgressSink};
use crate::core::pipeline::{ImageItem, ImagePipeline};
use crate::storage::{ArtifactRef, FileStorage};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs image batches as configured
#[derive(Clone)]
pub struct BatchRunner {
    config: Arc<Config>,
    storage: Arc<FileStorage>,
    pipeline: Arc<ImagePipeline>,
    scheduler: BatchScheduler,
}

impl BatchRunner {
    /// Create storage, providers and the pipeline
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing batch runner");

        let config = Arc::new(config);

        debug!("Initializing storage");
        let storage = Arc::new(FileStorage::new(&config.storage).await?);

        debug!("Initializing pipeline");
        let pipeline = Arc::new(ImagePipeline::from_config(&config, storage.clone())?);

        let scheduler = BatchScheduler::new(config.batch.concurrency);
        info!(
            concurrency = scheduler.concurrency(),
            generator = pipeline.generator_name(),
            describe = pipeline.has_describer(),
            "Batch runner initialized"
        );

        Ok(Self {
            config,
            storage,
            pipeline,
            scheduler,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }

    /// Start a single run over `items`
    pub fn start(&self, items: &[ImageItem]) -> BatchRun {
        self.scheduler.start(items, self.pipeline.clone())
    }

    /// Run `items`, then re-run the failed ones up to `batch.retries` times.
    ///
    /// Cancelling `shutdown` stops the current run and skips further retries.
    pub async fn run(
        &self,
        items: Vec<ImageItem>,
        sink: &dyn ProgressSink,
        shutdown: &CancellationToken,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        let mut pending = items;

        for attempt in 0..=self.config.batch.retries {
            if attempt > 0 {
                if pending.is_empty() || shutdown.is_cancelled() {
                    break;
                }
                info!(
                    "Retrying {} failed item(s), attempt {} of {}",
                    pending.len(),
                    attempt,
                    self.config.batch.retries
                );
            }

            let run = self.scheduler.start_with_cancellation(
                &pending,
                self.pipeline.clone(),
                shutdown.child_token(),
            );
            let summary = run.drive(sink).await?;

            let failed = summary.failed_indices();
            let stopped = summary.is_cancelled();
            pending = failed.into_iter().filter_map(|i| pending.get(i).cloned()).collect();
            report.attempts.push(summary);

            if stopped {
                warn!("Batch stopped; {} item(s) left unretried", pending.len());
                break;
            }
        }

        report.unresolved = pending.iter().map(|item| item.id()).collect();
        Ok(report)
    }

    /// Check that the output storage is usable
    pub async fn health_check(&self) -> Result<()> {
        self.storage.health_check().await
    }
}

/// Outcome of [`BatchRunner::run`], one summary per attempt
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub attempts: Vec<BatchSummary>,
    /// Ids of items that still failed after the last attempt
    pub unresolved: Vec<String>,
}

impl BatchReport {
    /// Status of the whole report
    pub fn status(&self) -> BatchStatus {
        match self.attempts.last() {
            Some(last) if last.is_cancelled() => BatchStatus::Stopped,
            _ if self.unresolved.is_empty() => BatchStatus::Succeeded,
            _ => BatchStatus::CompletedWithFailures,
        }
    }

    /// Every persisted artifact across attempts
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactRef> {
        self.attempts.iter().flat_map(|summary| summary.artifacts())
    }

    /// Message of the first attempt, which covers the full input
    pub fn first_message(&self) -> Option<String> {
        self.attempts.first().map(BatchSummary::message)
    }
}
