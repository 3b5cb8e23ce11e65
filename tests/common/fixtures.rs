//! Test fixtures and data factories
//!
//! All factories create real objects: encoded images, items and configs.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imagebatch::ImageItem;
use imagebatch::config::{Config, FileStorageConfig, ProviderConfig};
use std::io::Cursor;
use std::path::Path;

/// Factory for encoded test images and items
pub struct ImageFactory;

impl ImageFactory {
    /// PNG of a single color
    pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("encode png");
        buffer.into_inner()
    }

    /// Small red PNG item
    pub fn item(file_name: &str) -> ImageItem {
        ImageItem::new(
            format!("input/{}", file_name),
            file_name,
            Self::png(4, 4, [0xff, 0, 0, 0xff]),
        )
    }

    /// `count` items named `item-{i}.png`
    pub fn items(count: usize) -> Vec<ImageItem> {
        (0..count)
            .map(|i| Self::item(&format!("item-{}.png", i)))
            .collect()
    }

    /// Write PNG files named `names` into `dir`
    pub fn write_images(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), Self::png(2, 2, [0, 0, 0xff, 0xff]))
                .expect("write fixture image");
        }
    }
}

/// Mock provider config with a small canvas and memory storage
pub fn offline_config() -> Config {
    let mut config = Config::default();
    config.providers.push(ProviderConfig {
        width: Some(24),
        height: Some(12),
        ..ProviderConfig::new("offline", "mock")
    });
    config.storage = FileStorageConfig {
        storage_type: "memory".to_string(),
        local_path: None,
    };
    config.batch.canvas.width = 64;
    config.batch.canvas.height = 64;
    config.batch.canvas.inner_size = 48;
    config
}
