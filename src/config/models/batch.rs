//! Batch run configuration

use super::*;
use crate::core::pipeline::DEFAULT_NAME_PREFIX;
use serde::{Deserialize, Serialize};

/// Scheduler and pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pipelines in flight at once; values <= 0 behave as 1
    #[serde(default = "default_concurrency")]
    pub concurrency: i64,
    /// Prompt templates, rotated per item
    #[serde(default)]
    pub prompts: Vec<String>,
    /// Run the describe stage
    #[serde(default)]
    pub describe: bool,
    /// Used when describe fails; without it a describe failure fails the item
    #[serde(default)]
    pub fallback_description: Option<String>,
    /// Output name prefix
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Extra runs over the failed items of the previous run
    #[serde(default)]
    pub retries: u32,
    /// Output canvas
    #[serde(default)]
    pub canvas: CanvasConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            prompts: Vec::new(),
            describe: false,
            fallback_description: None,
            name_prefix: default_name_prefix(),
            retries: 0,
            canvas: CanvasConfig::default(),
        }
    }
}

/// Output canvas the generated image is fitted onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Disable to store provider bytes unchanged
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_canvas_size")]
    pub width: u32,
    #[serde(default = "default_canvas_size")]
    pub height: u32,
    /// Longest side of the fitted image
    #[serde(default = "default_inner_size")]
    pub inner_size: u32,
    /// `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_canvas_size(),
            height: default_canvas_size(),
            inner_size: default_inner_size(),
            background: default_background(),
        }
    }
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

fn default_canvas_size() -> u32 {
    1600
}

fn default_inner_size() -> u32 {
    1400
}

fn default_background() -> String {
    "#1e1e1e".to_string()
}
