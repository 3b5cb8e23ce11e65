//! Image pipeline against real storage and input files

#[cfg(test)]
mod tests {
    use crate::common::{ImageFactory, ScriptedGenerator};
    use crate::{assert_err, assert_ok};
    use imagebatch::core::pipeline::{CanvasNormalizer, PipelineError, PromptRotation};
    use imagebatch::core::providers::{MockDescriber, MockImageProvider};
    use imagebatch::storage::LocalStorage;
    use imagebatch::{BatchError, BatchScheduler, BatchStatus, ImageItem, ImagePipeline, collect_images};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_collect_images_from_directory() {
        let dir = TempDir::new().unwrap();
        ImageFactory::write_images(dir.path(), &["b.png", "a.PNG", "c.jpg"]);
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        ImageFactory::write_images(&dir.path().join("nested"), &["deep.png"]);

        let items = assert_ok!(collect_images(&[dir.path().to_path_buf()]).await);
        let names: Vec<_> = items.iter().map(ImageItem::file_name).collect();

        assert_eq!(names, vec!["a.PNG", "b.png", "c.jpg"]);
        assert_eq!(items[0].mime_type(), "image/png");
        // c.jpg holds PNG bytes; the header wins over the extension
        assert_eq!(items[2].mime_type(), "image/png");
        assert!(!items[1].is_empty());
    }

    #[tokio::test]
    async fn test_collect_images_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = assert_err!(collect_images(&[dir.path().join("missing")]).await);
        assert!(matches!(err, BatchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pipeline_writes_normalized_files() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        ImageFactory::write_images(input.path(), &["one.png", "two.png", "three.png"]);

        let store = Arc::new(LocalStorage::new(output.path()).await.unwrap());
        let pipeline = Arc::new(
            ImagePipeline::builder(Arc::new(MockImageProvider::new(30, 10)), store)
                .describer(Arc::new(MockDescriber::fixed("a blue square")))
                .prompts(PromptRotation::new(["Render {description}", "Draw {description}"]))
                .post_processor(Arc::new(CanvasNormalizer::new(40, 40, 20)))
                .build(),
        );

        let items = collect_images(&[input.path().to_path_buf()]).await.unwrap();
        let summary = BatchScheduler::new(2).start(&items, pipeline).wait().await.unwrap();
        assert_eq!(summary.status, BatchStatus::Succeeded);

        let names: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
        assert_eq!(names.len(), 3);
        for artifact in summary.artifacts() {
            let bytes = std::fs::read(&artifact.location).unwrap();
            assert_eq!(bytes.len() as u64, artifact.size);
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 40));
        }
    }

    #[tokio::test]
    async fn test_default_canvas_is_1600_square() {
        let output = TempDir::new().unwrap();
        let store = Arc::new(LocalStorage::new(output.path()).await.unwrap());
        let pipeline = Arc::new(
            ImagePipeline::builder(Arc::new(ScriptedGenerator::succeeding("stub")), store).build(),
        );

        let summary = BatchScheduler::new(1)
            .start(&[ImageFactory::item("square.png")], pipeline)
            .wait()
            .await
            .unwrap();

        let artifact = summary.artifacts().next().unwrap();
        let decoded = image::open(&artifact.location).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1600, 1600));
        let corner = decoded.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(corner, [0x1e, 0x1e, 0x1e, 0xff]);
    }

    #[tokio::test]
    async fn test_unwritable_store_fails_persist() {
        let output = TempDir::new().unwrap();
        let store = Arc::new(LocalStorage::new(output.path().join("out")).await.unwrap());
        std::fs::remove_dir(output.path().join("out")).unwrap();

        let pipeline = Arc::new(
            ImagePipeline::builder(Arc::new(ScriptedGenerator::succeeding("stub")), store)
                .post_processor(Arc::new(CanvasNormalizer::new(16, 16, 8)))
                .build(),
        );

        let summary = BatchScheduler::new(1)
            .start(&[ImageFactory::item("x.png")], pipeline)
            .wait()
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(matches!(summary.errors[0].error, PipelineError::Persist(_)));
    }
}
