//! Bounded-concurrency scheduler
//!
//! One driver task owns the [`RunState`]; every pipeline runs in its own task
//! and reports back over a channel. Queue pops and slot accounting therefore
//! never interleave, and completions are handled in the order they arrive.

use super::sink::{NoopSink, ProgressSink};
use super::state::{Launch, RunState, normalize_limit};
use super::traits::ItemPipeline;
use super::types::{BatchEvent, BatchItem, BatchSummary, ItemOutcome, ItemReport, PipelineContext};
use crate::core::pipeline::PipelineError;
use crate::utils::error::{BatchError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Starts batch runs with a fixed concurrency limit
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    concurrency: usize,
}

impl BatchScheduler {
    /// Create a scheduler. A limit of zero or below is treated as 1.
    pub fn new(concurrency_limit: i64) -> Self {
        Self {
            concurrency: normalize_limit(concurrency_limit),
        }
    }

    /// Effective concurrency limit
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start processing `items`. The caller's slice is copied, never mutated.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<I: BatchItem>(&self, items: &[I], pipeline: Arc<dyn ItemPipeline<I>>) -> BatchRun {
        self.start_with_cancellation(items, pipeline, CancellationToken::new())
    }

    /// Like [`start`](Self::start), but the run is cancelled through `cancellation`.
    /// Pass a fresh token, or a child token to tie the run to a wider shutdown.
    pub fn start_with_cancellation<I: BatchItem>(
        &self,
        items: &[I],
        pipeline: Arc<dyn ItemPipeline<I>>,
        cancellation: CancellationToken,
    ) -> BatchRun {
        let state = RunState::new(items, self.concurrency);
        let run_id = Uuid::new_v4().to_string();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        info!(
            run_id = %run_id,
            total = state.total(),
            limit = state.limit(),
            "Starting batch run"
        );

        tokio::spawn(drive(
            state,
            pipeline,
            cancellation.clone(),
            events_tx,
            run_id.clone(),
        ));

        BatchRun {
            events: events_rx,
            handle: BatchHandle {
                cancellation,
                run_id,
            },
            total: items.len(),
        }
    }
}

/// Convenience function for starting a run without keeping a scheduler around
pub fn start_batch<I: BatchItem>(
    items: &[I],
    concurrency_limit: i64,
    pipeline: Arc<dyn ItemPipeline<I>>,
) -> BatchRun {
    BatchScheduler::new(concurrency_limit).start(items, pipeline)
}

/// Cancellation handle of a run; cheap to clone
#[derive(Debug, Clone)]
pub struct BatchHandle {
    cancellation: CancellationToken,
    run_id: String,
}

impl BatchHandle {
    /// Request cancellation. Idempotent, and a no-op once the run has finished.
    pub fn cancel(&self) {
        if !self.cancellation.is_cancelled() {
            info!(run_id = %self.run_id, "Cancelling batch run");
        }
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The token shared with every pipeline of the run
    pub fn token(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}

/// A started run: its event stream plus a cancellation handle
#[derive(Debug)]
pub struct BatchRun {
    events: mpsc::UnboundedReceiver<BatchEvent>,
    handle: BatchHandle,
    total: usize,
}

impl BatchRun {
    pub fn handle(&self) -> BatchHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Next event, `None` once the terminal event has been consumed
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Drain events and return the terminal summary
    pub async fn wait(self) -> Result<BatchSummary> {
        self.drive(&NoopSink).await
    }

    /// Forward every event to `sink` and return the terminal summary
    pub async fn drive(mut self, sink: &dyn ProgressSink) -> Result<BatchSummary> {
        while let Some(event) = self.events.recv().await {
            match event {
                BatchEvent::Progress(progress) => sink.on_progress(&progress),
                BatchEvent::Finished(summary) => {
                    sink.on_complete(&summary);
                    return Ok(summary);
                }
            }
        }
        Err(BatchError::internal(format!(
            "Batch run {} ended without a terminal event",
            self.handle.run_id
        )))
    }
}

async fn drive<I: BatchItem>(
    mut state: RunState<I>,
    pipeline: Arc<dyn ItemPipeline<I>>,
    cancellation: CancellationToken,
    events: mpsc::UnboundedSender<BatchEvent>,
    run_id: String,
) {
    let started = Instant::now();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<ItemReport>();

    loop {
        if cancellation.is_cancelled() {
            state.cancel();
            break;
        }

        while let Some(launch) = state.next_launch() {
            debug!(
                run_id = %run_id,
                index = launch.index,
                active = state.active(),
                pending = state.pending(),
                "Launching pipeline"
            );
            spawn_worker(launch, pipeline.clone(), cancellation.clone(), done_tx.clone());
        }

        if state.is_drained() {
            break;
        }

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                state.cancel();
                break;
            }
            report = done_rx.recv() => {
                // The driver holds a sender, so the channel cannot close here
                let Some(report) = report else { break };
                if let ItemOutcome::Failed(error) = &report.outcome {
                    warn!(run_id = %run_id, index = report.index, item = %report.item_id, "Item failed: {}", error);
                }
                let progress = state.settle(report);
                debug!(
                    run_id = %run_id,
                    processed = progress.processed,
                    total = progress.total,
                    errors = progress.errors,
                    "Batch progress"
                );
                let _ = events.send(BatchEvent::Progress(progress));
            }
        }
    }

    if state.is_cancelled() {
        info!(
            run_id = %run_id,
            in_flight = state.active(),
            "Batch run stopped; in-flight pipelines abort on their own"
        );
    }

    let summary = state.into_summary(started.elapsed());
    info!(
        run_id = %run_id,
        status = ?summary.status,
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = summary.duration.as_millis() as u64,
        "Batch run finished"
    );
    let _ = events.send(BatchEvent::Finished(summary));
}

fn spawn_worker<I: BatchItem>(
    launch: Launch<I>,
    pipeline: Arc<dyn ItemPipeline<I>>,
    cancellation: CancellationToken,
    done: mpsc::UnboundedSender<ItemReport>,
) {
    tokio::spawn(async move {
        let Launch {
            index,
            item,
            processed_at_start,
        } = launch;
        let item_id = item.id();
        let ctx = PipelineContext::new(index, processed_at_start, cancellation);
        let start = Instant::now();

        // A panicking pipeline still has to free its slot
        let outcome = match AssertUnwindSafe(pipeline.run(item, ctx)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => ItemOutcome::Failed(PipelineError::internal(panic_message(&*panic))),
        };

        // Fails only after the run has already emitted its terminal event
        let _ = done.send(ItemReport {
            index,
            item_id,
            outcome,
            duration: start.elapsed(),
        });
    });
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("pipeline panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("pipeline panicked: {}", message)
    } else {
        "pipeline panicked".to_string()
    }
}
