//! Offline providers
//!
//! Deterministic stand-ins used for dry runs and tests. The generated image is
//! a white canvas with a color band derived from the prompt, so different
//! prompts yield different bytes.

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::time::Duration;

use super::http_image::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use super::unified_provider::ProviderError;
use crate::core::pipeline::ImageItem;
use crate::core::traits::{Describer, GeneratedImage, ImageGenerator};

#[derive(Debug, Clone)]
pub struct MockImageProvider {
    width: u32,
    height: u32,
    latency: Option<Duration>,
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            latency: None,
        }
    }
}

impl MockImageProvider {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            latency: None,
        }
    }

    /// Simulated request time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn render(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let digest = Sha256::digest(prompt.as_bytes());
        let band = Rgba([digest[0], digest[1], digest[2], 0xff]);

        let mut img = RgbaImage::from_pixel(self.width, self.height, Rgba([0xff, 0xff, 0xff, 0xff]));
        let band_top = self.height / 3;
        let band_bottom = (self.height * 2 / 3).max(band_top + 1).min(self.height);
        for y in band_top..band_bottom {
            for x in 0..self.width {
                img.put_pixel(x, y, band);
            }
        }

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| ProviderError::serialization("mock", e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[async_trait]
impl ImageGenerator for MockImageProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let bytes = self.render(prompt)?;
        Ok(GeneratedImage::new(bytes, "image/png", "mock"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockDescriber {
    description: Option<String>,
}

impl MockDescriber {
    /// Always answer with `description`
    pub fn fixed(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

#[async_trait]
impl Describer for MockDescriber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn describe(&self, item: &ImageItem) -> Result<String, ProviderError> {
        Ok(match &self.description {
            Some(description) => description.clone(),
            None => format!("the product shown in {}", item.file_name()),
        })
    }
}
