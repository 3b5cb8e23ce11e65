//! Configuration loading and validation

#[cfg(test)]
mod tests {
    use crate::common::offline_config;
    use crate::{assert_err, assert_ok};
    use imagebatch::config::{Config, LogFormat};
    use imagebatch::{BatchError, BatchRunner, FileStorage};
    use tempfile::TempDir;

    const EXAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/imagebatch.yaml.example");

    #[tokio::test]
    async fn test_example_config_is_valid() {
        let config = assert_ok!(Config::from_file(EXAMPLE).await);

        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.batch.prompts.len(), 2);
        assert_eq!(config.batch.retries, 1);
        assert_eq!(config.enabled_providers().count(), 1);
        assert_eq!(config.active_describer().map(|d| d.name.as_str()), Some("gemini-describe"));
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[tokio::test]
    async fn test_runner_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("out");

        let mut config = offline_config();
        config.storage.storage_type = "local".to_string();
        config.storage.local_path = Some(output.display().to_string());

        let runner = assert_ok!(BatchRunner::new(config).await);
        assert!(output.is_dir());
        assert!(runner.health_check().await.is_ok());
        assert!(matches!(runner.storage(), FileStorage::Local(_)));
    }

    #[tokio::test]
    async fn test_disabled_canvas_keeps_generated_bytes() {
        let mut config = offline_config();
        config.batch.canvas.enabled = false;
        config.batch.canvas.inner_size = 10_000;
        assert_ok!(config.validate());

        let runner = assert_ok!(BatchRunner::new(config).await);
        let summary = runner
            .start(&crate::common::ImageFactory::items(1))
            .wait()
            .await
            .unwrap();

        let artifact = summary.artifacts().next().unwrap();
        let FileStorage::Memory(memory) = runner.storage() else {
            panic!("expected memory storage");
        };
        let bytes = memory.get(&artifact.name).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 12));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases: [(&str, fn(&mut Config)); 9] = [
            ("concurrency", |c: &mut Config| c.batch.concurrency = 1000),
            ("prefix", |c: &mut Config| c.batch.name_prefix = "../up".to_string()),
            ("retries", |c: &mut Config| c.batch.retries = 99),
            ("inner size", |c: &mut Config| c.batch.canvas.inner_size = 65),
            ("background", |c: &mut Config| c.batch.canvas.background = "grey".to_string()),
            ("storage", |c: &mut Config| c.storage.storage_type = "s3".to_string()),
            ("log level", |c: &mut Config| c.logging.level = "imagebatch=loud".to_string()),
            ("base url", |c: &mut Config| {
                c.providers[0].base_url = Some("ftp://example.com".to_string())
            }),
            ("provider type", |c: &mut Config| {
                c.providers[0].provider_type = "dalle".to_string()
            }),
        ];

        for (label, mutate) in cases {
            let mut config = offline_config();
            mutate(&mut config);
            let err = assert_err!(config.validate());
            assert!(matches!(err, BatchError::Config(_)), "{}: {:?}", label, err);
        }
    }

    #[test]
    fn test_gemini_provider_needs_key_source() {
        let yaml = r#"
providers:
  - name: "gemini"
    provider_type: "gemini"
"#;
        let err = assert_err!(Config::from_yaml_str(yaml));
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
providers:
  - name: "offline"
    provider_type: "mock"
"#;
        let config = assert_ok!(Config::from_yaml_str(yaml));
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.batch.name_prefix, "NB_PRO");
        assert_eq!(config.storage.local_path.as_deref(), Some("./output"));
        assert!(config.active_describer().is_none());
    }
}
