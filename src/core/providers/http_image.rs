//! Self-hosted image endpoints
//!
//! NanoBanana and ComfyUI style servers take `{prompt, width, height}` as JSON
//! and answer with the encoded image as the response body.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::unified_provider::ProviderError;
use crate::config::ProviderConfig;
use crate::core::traits::{GeneratedImage, ImageGenerator};

pub const DEFAULT_WIDTH: u32 = 860;
pub const DEFAULT_HEIGHT: u32 = 1200;

/// Endpoint flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpImageKind {
    /// POST to the configured URL as-is
    NanoBanana,
    /// POST to `{base_url}/generate`
    ComfyUi,
}

impl HttpImageKind {
    pub fn from_type(provider_type: &str) -> Option<Self> {
        match provider_type {
            "nanobanana" => Some(Self::NanoBanana),
            "comfyui" => Some(Self::ComfyUi),
            _ => None,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::NanoBanana => "nanobanana",
            Self::ComfyUi => "comfyui",
        }
    }

    fn endpoint(&self, base_url: &str) -> String {
        match self {
            Self::NanoBanana => base_url.to_string(),
            Self::ComfyUi => format!("{}/generate", base_url.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub struct HttpImageProvider {
    kind: HttpImageKind,
    name: String,
    endpoint: String,
    width: u32,
    height: u32,
    api_key: Option<String>,
    client: Client,
}

impl HttpImageProvider {
    pub fn new(kind: HttpImageKind, base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::network(kind.provider_name(), format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            kind,
            name: kind.provider_name().to_string(),
            endpoint: kind.endpoint(base_url),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            api_key: None,
            client,
        })
    }

    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let kind = HttpImageKind::from_type(&config.provider_type).ok_or_else(|| {
            ProviderError::configuration(
                "http",
                format!("'{}' is not an HTTP image provider", config.provider_type),
            )
        })?;
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            ProviderError::configuration(
                kind.provider_name(),
                format!("Provider {} requires base_url", config.name),
            )
        })?;

        let mut provider = Self::new(kind, base_url, Duration::from_secs(config.timeout))?
            .with_size(
                config.width.unwrap_or(DEFAULT_WIDTH),
                config.height.unwrap_or(DEFAULT_HEIGHT),
            );
        provider.name = config.name.clone();
        provider.api_key = config.resolve_api_key();
        Ok(provider)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn kind(&self) -> HttpImageKind {
        self.kind
    }
}

#[async_trait]
impl ImageGenerator for HttpImageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let provider = self.kind.provider_name();
        let body = GenerateRequest {
            prompt,
            width: self.width,
            height: self.height,
        };
        debug!("POST {} ({}x{})", self.endpoint, self.width, self.height);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(provider, e.to_string())
            } else {
                ProviderError::network(provider, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_status(provider, status.as_u16(), &body));
        }

        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::network(provider, format!("Failed to read body: {}", e)))?;

        if bytes.is_empty() {
            return Err(ProviderError::response_parsing(provider, "empty response body"));
        }

        let mime_type = match header_mime {
            Some(mime) => mime,
            None => image::guess_format(&bytes)
                .map(|format| format.to_mime_type().to_string())
                .map_err(|_| {
                    ProviderError::response_parsing(provider, "response body is not an image")
                })?,
        };

        Ok(GeneratedImage::new(bytes, mime_type, self.name.clone()))
    }
}
