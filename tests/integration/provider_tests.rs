//! Provider integration tests
//!
//! Gemini and the HTTP image endpoints against a local wiremock server.

#[cfg(test)]
mod tests {
    use crate::common::ImageFactory;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use imagebatch::config::ProviderConfig;
    use imagebatch::core::providers::gemini::GeminiConfigBuilder;
    use imagebatch::core::providers::{
        GeminiProvider, HttpImageKind, HttpImageProvider, build_generator_chain,
    };
    use imagebatch::core::traits::{Describer, ImageGenerator};
    use imagebatch::ProviderError;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE_PATH: &str = "/v1beta/models/gemini-3-pro-image-preview:generateContent";
    const TEXT_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn gemini(server: &MockServer) -> GeminiProvider {
        let config = GeminiConfigBuilder::google_ai("test-key")
            .with_base_url(server.uri())
            .build()
            .unwrap();
        GeminiProvider::new(config).unwrap()
    }

    fn image_response(bytes: &[u8]) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(bytes)}}
                    ]
                },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_gemini_generate() {
        let server = MockServer::start().await;
        let png = ImageFactory::png(3, 3, [1, 2, 3, 255]);

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_response(&png)))
            .expect(1)
            .mount(&server)
            .await;

        let image = gemini(&server).generate("a lamp").await.unwrap();
        assert_eq!(image.bytes.as_ref(), png.as_slice());
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.provider, "gemini");
    }

    #[tokio::test]
    async fn test_gemini_describe() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "A brass desk lamp."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let description = gemini(&server)
            .describe(&ImageFactory::item("lamp.png"))
            .await
            .unwrap();
        assert_eq!(description, "A brass desk lamp.");
    }

    #[tokio::test]
    async fn test_gemini_rate_limit_carries_retry_delay() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted",
                    "status": "RESOURCE_EXHAUSTED",
                    "details": [{
                        "@type": "type.googleapis.com/google.rpc.RetryInfo",
                        "retryDelay": "29.5s"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let err = gemini(&server).generate("a lamp").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit { retry_after: Some(30), .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_gemini_permission_denied() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let err = gemini(&server).generate("a lamp").await.unwrap_err();
        assert!(matches!(err, ProviderError::Authentication { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_gemini_safety_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "IMAGE_SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = gemini(&server).generate("something").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest { .. }));
        assert!(err.to_string().contains("IMAGE_SAFETY"));
    }

    #[tokio::test]
    async fn test_nanobanana_generate() {
        let server = MockServer::start().await;
        let png = ImageFactory::png(2, 2, [0, 0, 0, 255]);

        Mock::given(method("POST"))
            .and(path("/api/generate-image"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"prompt": "a lamp", "width": 64, "height": 32})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(png.clone()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpImageProvider::new(
            HttpImageKind::NanoBanana,
            &format!("{}/api/generate-image", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_size(64, 32)
        .with_api_key("secret");

        let image = provider.generate("a lamp").await.unwrap();
        assert_eq!(image.bytes.as_ref(), png.as_slice());
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_comfyui_guesses_mime_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/octet-stream")
                    .set_body_bytes(ImageFactory::png(2, 2, [9, 9, 9, 255])),
            )
            .mount(&server)
            .await;

        let provider =
            HttpImageProvider::new(HttpImageKind::ComfyUi, &server.uri(), Duration::from_secs(5))
                .unwrap();
        assert!(provider.endpoint().ends_with("/generate"));

        let image = provider.generate("a lamp").await.unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_http_image_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/broken/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("worker crashed"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/empty/generate"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/text/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
            .mount(&server)
            .await;

        let comfy = |prefix: &str| {
            HttpImageProvider::new(
                HttpImageKind::ComfyUi,
                &format!("{}/{}", server.uri(), prefix),
                Duration::from_secs(5),
            )
            .unwrap()
        };

        let err = comfy("broken").generate("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
        assert!(err.is_retryable());

        let err = comfy("empty").generate("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::ResponseParsing { .. }));

        let err = comfy("text").generate("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::ResponseParsing { .. }));
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_next_provider() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/banana"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(ImageFactory::png(2, 2, [0, 0, 0, 255])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let providers = vec![
            ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: Some(server.uri()),
                ..ProviderConfig::new("primary", "gemini")
            },
            ProviderConfig {
                base_url: Some(format!("{}/banana", server.uri())),
                ..ProviderConfig::new("backup", "nanobanana")
            },
        ];

        let chain = build_generator_chain(&providers).unwrap();
        assert_eq!(chain.names(), vec!["gemini", "backup"]);

        let image = chain.generate("a lamp").await.unwrap();
        assert_eq!(image.provider, "backup");
    }

    #[tokio::test]
    async fn test_chain_reports_every_attempt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let providers = vec![
            ProviderConfig {
                base_url: Some(server.uri()),
                ..ProviderConfig::new("first", "comfyui")
            },
            ProviderConfig {
                base_url: Some(server.uri()),
                ..ProviderConfig::new("second", "nanobanana")
            },
        ];

        let chain = build_generator_chain(&providers).unwrap();
        match chain.generate("a lamp").await.unwrap_err() {
            ProviderError::RoutingError {
                attempted_providers,
                ..
            } => assert_eq!(attempted_providers, vec!["first", "second"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
