//! Per-item image pipeline
//!
//! describe → generate → post-process → persist, with a cancellation
//! checkpoint before every stage.

mod builder;
mod error;
mod image_pipeline;
mod item;
mod naming;
mod postprocess;
mod prompt;


pub use builder::ImagePipelineBuilder;
pub use error::PipelineError;
pub use image_pipeline::ImagePipeline;
pub use item::{IMAGE_EXTENSIONS, ImageItem, collect_images, is_image_path};
pub use naming::{ArtifactNamer, DEFAULT_NAME_PREFIX};
pub use postprocess::{CanvasNormalizer, Passthrough, PostProcessor, ProcessedImage, parse_hex_color};
pub use prompt::{DEFAULT_PROMPT, DESCRIPTION_PLACEHOLDER, PromptRotation};
