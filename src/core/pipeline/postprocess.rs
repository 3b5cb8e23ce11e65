//! Post-processing of generated images
//!
//! Runs on the blocking pool; decoding and resampling are CPU-bound.

use super::error::PipelineError;
use crate::config::CanvasConfig;
use crate::core::traits::GeneratedImage;
use crate::utils::error::{BatchError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fmt::Debug;
use std::io::Cursor;

/// Bytes ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    /// File extension without the dot
    pub extension: &'static str,
    pub mime_type: String,
}

/// Transforms a generated image into its stored form
pub trait PostProcessor: Send + Sync + Debug {
    fn process(&self, image: &GeneratedImage) -> std::result::Result<ProcessedImage, PipelineError>;
}

/// Fits the image into a fixed square-ish canvas and encodes it as PNG.
///
/// The image is scaled, up or down, so its longest side fits `inner_size`,
/// then centered on a `width` x `height` background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasNormalizer {
    width: u32,
    height: u32,
    inner_size: u32,
    background: Rgba<u8>,
}

impl Default for CanvasNormalizer {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1600,
            inner_size: 1400,
            background: Rgba([0x1e, 0x1e, 0x1e, 0xff]),
        }
    }
}

impl CanvasNormalizer {
    pub fn new(width: u32, height: u32, inner_size: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            inner_size: inner_size.max(1),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        let background = parse_hex_color(&config.background).ok_or_else(|| {
            BatchError::config(format!("Invalid canvas background color: {}", config.background))
        })?;
        Ok(Self::new(config.width, config.height, config.inner_size).with_background(background))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fit(&self, image: &DynamicImage) -> RgbaImage {
        let box_width = self.inner_size.min(self.width);
        let box_height = self.inner_size.min(self.height);
        let scaled = image.resize(box_width, box_height, FilterType::Triangle).to_rgba8();

        let mut canvas = RgbaImage::from_pixel(self.width, self.height, self.background);
        let x = (self.width - scaled.width().min(self.width)) / 2;
        let y = (self.height - scaled.height().min(self.height)) / 2;
        imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
        canvas
    }
}

impl PostProcessor for CanvasNormalizer {
    fn process(&self, image: &GeneratedImage) -> std::result::Result<ProcessedImage, PipelineError> {
        let decoded = image::load_from_memory(&image.bytes).map_err(|e| {
            PipelineError::post_process(format!(
                "cannot decode {} image from {}: {}",
                image.mime_type, image.provider, e
            ))
        })?;

        let canvas = self.fit(&decoded);
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| PipelineError::post_process(format!("PNG encoding failed: {}", e)))?;

        Ok(ProcessedImage {
            bytes: buffer.into_inner(),
            extension: "png",
            mime_type: "image/png".to_string(),
        })
    }
}

/// Stores the provider bytes unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl PostProcessor for Passthrough {
    fn process(&self, image: &GeneratedImage) -> std::result::Result<ProcessedImage, PipelineError> {
        if image.bytes.is_empty() {
            return Err(PipelineError::post_process(format!(
                "{} returned an empty image",
                image.provider
            )));
        }

        Ok(ProcessedImage {
            bytes: image.bytes.to_vec(),
            extension: extension_for(&image.mime_type),
            mime_type: image.mime_type.clone(),
        })
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "png",
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 0xff])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}
