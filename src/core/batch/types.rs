//! Batch processing types and data structures

use crate::core::pipeline::PipelineError;
use crate::storage::ArtifactRef;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A unit of work submitted to the scheduler.
///
/// The scheduler clones items out of the caller's slice and only reads them.
/// Identity is used for reporting; duplicate ids are processed independently.
pub trait BatchItem: Clone + Send + Sync + 'static {
    /// Stable identity of the item
    fn id(&self) -> String;
}

impl BatchItem for String {
    fn id(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_batch_item_for_int {
    ($($ty:ty),*) => {
        $(
            impl BatchItem for $ty {
                fn id(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_batch_item_for_int!(u32, u64, usize);

/// Per-item context handed to a pipeline when it is launched
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Position of the item in the submitted list
    pub index: usize,
    /// Number of items already settled when this one was launched
    pub processed_at_start: usize,
    /// Run-wide cancellation token, shared by every pipeline of the run
    pub cancellation: CancellationToken,
}

impl PipelineContext {
    pub fn new(index: usize, processed_at_start: usize, cancellation: CancellationToken) -> Self {
        Self {
            index,
            processed_at_start,
            cancellation,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Artifact written through the storage collaborator
    Persisted(ArtifactRef),
    /// Item failed; fatal to this item only
    Failed(PipelineError),
    /// Aborted by the cancellation token; not counted as an error
    Cancelled,
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn artifact(&self) -> Option<&ArtifactRef> {
        match self {
            Self::Persisted(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Settled item as reported back to the scheduler
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Index of the item in the submitted list
    pub index: usize,
    /// Item identity
    pub item_id: String,
    /// Pipeline outcome
    pub outcome: ItemOutcome,
    /// Time spent in the pipeline
    pub duration: Duration,
}

/// Recorded failure reason
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub index: usize,
    pub item_id: String,
    pub error: PipelineError,
}

/// Progress event, emitted in completion order
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Items settled so far
    pub processed: usize,
    /// Items submitted
    pub total: usize,
    /// Failures so far
    pub errors: usize,
    /// Pipelines still in flight after this one settled
    pub active: usize,
    /// The item that just settled
    pub report: ItemReport,
}

impl BatchProgress {
    /// Completion percentage in `0.0..=100.0`
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// Every item settled and none failed
    Succeeded,
    /// Every item settled and at least one failed
    CompletedWithFailures,
    /// Cancelled before the queue drained
    Stopped,
}

/// Terminal event payload
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub status: BatchStatus,
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Items that settled with [`ItemOutcome::Cancelled`]
    pub skipped: usize,
    /// Failure reasons in completion order
    pub errors: Vec<ItemFailure>,
    /// Every settled item in completion order
    pub results: Vec<ItemReport>,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn is_cancelled(&self) -> bool {
        self.status == BatchStatus::Stopped
    }

    /// Caller-facing message, one per terminal status
    pub fn message(&self) -> String {
        match self.status {
            BatchStatus::Succeeded => {
                format!("All {} items completed successfully.", self.total)
            }
            BatchStatus::CompletedWithFailures => format!(
                "Completed with {} failure(s): {} of {} items succeeded.",
                self.failed, self.succeeded, self.total
            ),
            BatchStatus::Stopped => format!(
                "Cancelled by user after {} of {} items.",
                self.processed, self.total
            ),
        }
    }

    /// Indices of failed items, ascending. Callers re-enqueue these to retry.
    pub fn failed_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.errors.iter().map(|f| f.index).collect();
        indices.sort_unstable();
        indices
    }

    /// Persisted artifacts in completion order
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactRef> {
        self.results.iter().filter_map(|r| r.outcome.artifact())
    }
}

/// Event stream of a run
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Progress(BatchProgress),
    Finished(BatchSummary),
}
