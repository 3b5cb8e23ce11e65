//! Run state owned by a single scheduler driver

use super::types::{
    BatchItem, BatchProgress, BatchStatus, BatchSummary, ItemFailure, ItemOutcome, ItemReport,
};
use std::collections::VecDeque;
use std::time::Duration;

/// Concurrency limit actually used: zero or negative limits become 1
pub fn normalize_limit(limit: i64) -> usize {
    if limit <= 0 {
        1
    } else {
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

/// An item popped from the queue, ready to run
#[derive(Debug, Clone)]
pub struct Launch<I> {
    pub index: usize,
    pub item: I,
    pub processed_at_start: usize,
}

/// Mutable state of one batch run.
///
/// Invariants: `active <= limit`; `processed` only grows; once `cancelled`
/// is set no further launch is handed out.
#[derive(Debug)]
pub struct RunState<I> {
    queue: VecDeque<(usize, I)>,
    limit: usize,
    total: usize,
    active: usize,
    processed: usize,
    succeeded: usize,
    skipped: usize,
    errors: Vec<ItemFailure>,
    results: Vec<ItemReport>,
    cancelled: bool,
}

impl<I: BatchItem> RunState<I> {
    /// Copy `items` into a fresh queue. A limit of zero becomes 1.
    pub fn new(items: &[I], limit: usize) -> Self {
        Self {
            queue: items.iter().cloned().enumerate().collect(),
            limit: limit.max(1),
            total: items.len(),
            active: 0,
            processed: 0,
            succeeded: 0,
            skipped: 0,
            errors: Vec::new(),
            results: Vec::with_capacity(items.len()),
            cancelled: false,
        }
    }

    /// Fill phase step: pop the next item if a slot is free
    pub fn next_launch(&mut self) -> Option<Launch<I>> {
        if self.cancelled || self.active >= self.limit {
            return None;
        }
        let (index, item) = self.queue.pop_front()?;
        self.active += 1;
        Some(Launch {
            index,
            item,
            processed_at_start: self.processed,
        })
    }

    /// Record a settled pipeline and free its slot
    pub fn settle(&mut self, report: ItemReport) -> BatchProgress {
        debug_assert!(self.active > 0, "settle without an active pipeline");
        self.active = self.active.saturating_sub(1);
        self.processed += 1;

        match &report.outcome {
            ItemOutcome::Persisted(_) => self.succeeded += 1,
            ItemOutcome::Failed(error) => self.errors.push(ItemFailure {
                index: report.index,
                item_id: report.item_id.clone(),
                error: error.clone(),
            }),
            ItemOutcome::Cancelled => self.skipped += 1,
        }
        self.results.push(report.clone());

        BatchProgress {
            processed: self.processed,
            total: self.total,
            errors: self.errors.len(),
            active: self.active,
            report,
        }
    }

    /// Stop handing out launches. Monotonic.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Queue empty and nothing in flight
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.active == 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn status(&self) -> BatchStatus {
        if self.cancelled {
            BatchStatus::Stopped
        } else if self.errors.is_empty() {
            BatchStatus::Succeeded
        } else {
            BatchStatus::CompletedWithFailures
        }
    }

    pub fn into_summary(self, duration: Duration) -> BatchSummary {
        BatchSummary {
            status: self.status(),
            total: self.total,
            processed: self.processed,
            succeeded: self.succeeded,
            failed: self.errors.len(),
            skipped: self.skipped,
            errors: self.errors,
            results: self.results,
            duration,
        }
    }
}
