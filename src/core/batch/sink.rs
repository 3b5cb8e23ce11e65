//! Progress sinks

use super::types::{BatchProgress, BatchStatus, BatchSummary};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Receives progress and completion notifications. Rendering is the sink's concern.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: &BatchProgress);
    fn on_complete(&self, summary: &BatchSummary);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_progress(&self, _progress: &BatchProgress) {}
    fn on_complete(&self, _summary: &BatchSummary) {}
}

/// Logs events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_progress(&self, progress: &BatchProgress) {
        info!(
            "Processing: {} / {} ({:.0}%), {} error(s)",
            progress.processed,
            progress.total,
            progress.percent(),
            progress.errors
        );
    }

    fn on_complete(&self, summary: &BatchSummary) {
        match summary.status {
            BatchStatus::Succeeded => info!("{}", summary.message()),
            BatchStatus::CompletedWithFailures => {
                warn!("{}", summary.message());
                for failure in &summary.errors {
                    warn!("  #{} {}: {}", failure.index, failure.item_id, failure.error);
                }
            }
            BatchStatus::Stopped => warn!("{}", summary.message()),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    progress: Mutex<Vec<BatchProgress>>,
    summary: Mutex<Option<BatchSummary>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Vec<BatchProgress> {
        self.progress.lock().clone()
    }

    pub fn summary(&self) -> Option<BatchSummary> {
        self.summary.lock().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn on_progress(&self, progress: &BatchProgress) {
        self.progress.lock().push(progress.clone());
    }

    fn on_complete(&self, summary: &BatchSummary) {
        *self.summary.lock() = Some(summary.clone());
    }
}
