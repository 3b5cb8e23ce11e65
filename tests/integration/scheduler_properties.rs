//! Property-based tests for the scheduler invariants

use imagebatch::core::batch::normalize_limit;
use imagebatch::storage::ArtifactRef;
use imagebatch::{
    BatchStatus, BatchSummary, ItemOutcome, ItemPipeline, PipelineContext, PipelineError, pipeline_fn,
    start_batch,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Item count, concurrency limit and the indices that fail
fn arb_batch() -> impl Strategy<Value = (usize, i64, BTreeSet<usize>)> {
    (0usize..40, -2i64..8).prop_flat_map(|(count, limit)| {
        let failing = if count == 0 {
            Just(BTreeSet::new()).boxed()
        } else {
            prop::collection::btree_set(0..count, 0..=count.min(6)).boxed()
        };
        (Just(count), Just(limit), failing)
    })
}

fn artifact(index: usize) -> ArtifactRef {
    ArtifactRef {
        name: format!("artifact-{}", index),
        location: format!("memory://artifact-{}", index),
        content_type: "image/png".to_string(),
        size: 0,
        checksum: String::new(),
        created_at: chrono::Utc::now(),
    }
}

/// Run `0..count` through a stub that fails exactly the `failing` indices.
/// Returns the summary and the peak number of concurrent pipelines.
fn run_scripted(count: usize, limit: i64, failing: &BTreeSet<usize>) -> (BatchSummary, usize) {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let failing = Arc::new(failing.clone());

    let summary = tokio::runtime::Runtime::new().unwrap().block_on({
        let active = active.clone();
        let peak = peak.clone();
        async move {
            let pipeline: Arc<dyn ItemPipeline<usize>> =
                Arc::new(pipeline_fn(move |n: usize, _ctx: PipelineContext| {
                    let active = active.clone();
                    let peak = peak.clone();
                    let failing = failing.clone();
                    async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                        if failing.contains(&n) {
                            ItemOutcome::Failed(PipelineError::generate("scripted"))
                        } else {
                            ItemOutcome::Persisted(artifact(n))
                        }
                    }
                }));

            let items: Vec<usize> = (0..count).collect();
            start_batch(&items, limit, pipeline).wait().await.unwrap()
        }
    });

    (summary, peak.load(Ordering::SeqCst))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: the limit is never exceeded and every item is classified once
    #[test]
    fn prop_limit_and_accounting((count, limit, failing) in arb_batch()) {
        let (summary, peak) = run_scripted(count, limit, &failing);

        prop_assert!(peak <= normalize_limit(limit));
        prop_assert_eq!(summary.processed, count);
        prop_assert_eq!(summary.succeeded + summary.failed, count);
        prop_assert_eq!(summary.failed_indices(), failing.iter().copied().collect::<Vec<_>>());

        let expected = if failing.is_empty() {
            BatchStatus::Succeeded
        } else {
            BatchStatus::CompletedWithFailures
        };
        prop_assert_eq!(summary.status, expected);
    }

    /// Property: a deterministic pipeline classifies the same list identically
    /// on every run, whatever the completion order
    #[test]
    fn prop_repeat_run_same_classification((count, limit, failing) in arb_batch()) {
        let (first, _) = run_scripted(count, limit, &failing);
        let (second, _) = run_scripted(count, limit, &failing);

        prop_assert_eq!(first.failed_indices(), second.failed_indices());
        prop_assert_eq!(first.succeeded, second.succeeded);
        prop_assert_eq!(first.failed, second.failed);
        prop_assert_eq!(first.status, second.status);
    }
}
