//! Scheduler driving the real image pipeline

#[cfg(test)]
mod tests {
    use crate::common::{FlakyGenerator, ImageFactory, ScriptedGenerator, offline_config};
    use imagebatch::core::pipeline::{CanvasNormalizer, PromptRotation};
    use imagebatch::core::providers::{MockDescriber, MockImageProvider};
    use imagebatch::storage::MemoryStorage;
    use imagebatch::{
        BatchRunner, BatchScheduler, BatchStatus, CollectingSink, ImageItem, ImagePipeline, ItemPipeline,
        NoopSink,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn small_canvas() -> Arc<CanvasNormalizer> {
        Arc::new(CanvasNormalizer::new(32, 32, 24))
    }

    #[tokio::test]
    async fn test_failures_at_indices_two_and_seven() {
        let store = MemoryStorage::new();
        let generator = Arc::new(ScriptedGenerator::failing_on(
            "scripted",
            &["item-2.png", "item-7.png"],
        ));
        let pipeline: Arc<dyn ItemPipeline<ImageItem>> = Arc::new(
            ImagePipeline::builder(generator.clone(), Arc::new(store.clone()))
                .describer(Arc::new(MockDescriber::default()))
                .prompts(PromptRotation::new(["Studio shot of {description}"]))
                .post_processor(small_canvas())
                .build(),
        );

        let sink = CollectingSink::new();
        let summary = BatchScheduler::new(4)
            .start(&ImageFactory::items(10), pipeline)
            .drive(&sink)
            .await
            .unwrap();

        assert_eq!(summary.status, BatchStatus::CompletedWithFailures);
        assert_eq!(summary.failed_indices(), vec![2, 7]);
        assert_eq!(summary.succeeded, 8);
        assert_eq!(sink.progress().len(), 10);
        assert_eq!(generator.calls(), 10);
        assert!(
            generator
                .prompts()
                .iter()
                .all(|p| p.starts_with("Studio shot of the product shown in item-"))
        );
        assert_eq!(store.len(), 8);
        assert!(
            store
                .names()
                .iter()
                .all(|name| name.starts_with("NB_PRO_") && name.ends_with(".png"))
        );
        assert!(summary.errors.iter().all(|f| f.error.stage() == "generate"));
    }

    #[tokio::test]
    async fn test_rerunning_failed_items_recovers_them() {
        let store = MemoryStorage::new();
        let pipeline: Arc<dyn ItemPipeline<ImageItem>> = Arc::new(
            ImagePipeline::builder(Arc::new(FlakyGenerator::new(1)), Arc::new(store.clone()))
                .describer(Arc::new(MockDescriber::default()))
                .post_processor(small_canvas())
                .build(),
        );
        let scheduler = BatchScheduler::new(2);
        let items = ImageFactory::items(4);

        let first = scheduler.start(&items, pipeline.clone()).wait().await.unwrap();
        assert_eq!(first.failed, 4);
        assert_eq!(store.len(), 0);

        let retry: Vec<_> = first
            .failed_indices()
            .into_iter()
            .map(|i| items[i].clone())
            .collect();
        let second = scheduler.start(&retry, pipeline).wait().await.unwrap();
        assert_eq!(second.status, BatchStatus::Succeeded);
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_cancel_during_generation_persists_nothing() {
        let store = MemoryStorage::new();
        let generator =
            Arc::new(MockImageProvider::new(8, 8).with_latency(Duration::from_millis(500)));
        let pipeline: Arc<dyn ItemPipeline<ImageItem>> = Arc::new(
            ImagePipeline::builder(generator, Arc::new(store.clone()))
                .post_processor(small_canvas())
                .build(),
        );

        let run = BatchScheduler::new(2).start(&ImageFactory::items(6), pipeline);
        let handle = run.handle();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();

        let summary = run.wait().await.unwrap();
        assert_eq!(summary.status, BatchStatus::Stopped);
        assert_eq!(summary.succeeded, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.is_empty());
        handle.cancel();
    }

    #[tokio::test]
    async fn test_runner_with_describer() {
        let mut config = offline_config();
        config.batch.describe = true;
        config.describer = Some(imagebatch::config::ProviderConfig::new("describe", "mock"));
        config.batch.prompts = vec!["Photo of {description}".to_string()];
        config.batch.name_prefix = "TEST".to_string();

        let runner = BatchRunner::new(config).await.unwrap();
        assert!(runner.pipeline().has_describer());

        let report = runner
            .run(ImageFactory::items(5), &NoopSink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status(), BatchStatus::Succeeded);
        assert_eq!(report.attempts.len(), 1);
        let artifacts: Vec<_> = report.artifacts().collect();
        assert_eq!(artifacts.len(), 5);
        assert!(artifacts.iter().all(|a| a.name.starts_with("TEST_")));
        assert!(artifacts.iter().all(|a| a.content_type == "image/png"));
        assert_eq!(
            report.first_message().as_deref(),
            Some("All 5 items completed successfully.")
        );
    }
}
