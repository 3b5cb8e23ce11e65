//! Provider test utilities
//!
//! Scripted generators for the pipeline's generate seam. Each one renders a
//! real PNG so post-processing runs on valid input.

use async_trait::async_trait;
use imagebatch::core::traits::{GeneratedImage, ImageGenerator};
use imagebatch::ProviderError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::fixtures::ImageFactory;

/// Fails every prompt containing one of `fail_on`, succeeds otherwise
#[derive(Debug)]
pub struct ScriptedGenerator {
    name: String,
    fail_on: Vec<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn succeeding(name: &str) -> Self {
        Self::failing_on(name, &[])
    }

    pub fn failing_on(name: &str, needles: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fail_on: needles.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if self.fail_on.iter().any(|needle| prompt.contains(needle.as_str())) {
            return Err(ProviderError::api_error("scripted", 500, "scripted failure"));
        }
        Ok(GeneratedImage::new(
            ImageFactory::png(8, 8, [0, 0xff, 0, 0xff]),
            "image/png",
            self.name.clone(),
        ))
    }
}

/// Fails the first `failures` calls for each distinct prompt
#[derive(Debug, Default)]
pub struct FlakyGenerator {
    failures: usize,
    seen: Mutex<HashMap<String, usize>>,
}

impl FlakyGenerator {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            seen: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ImageGenerator for FlakyGenerator {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let attempt = {
            let mut seen = self.seen.lock();
            let count = seen.entry(prompt.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if attempt <= self.failures {
            return Err(ProviderError::provider_unavailable("flaky", "try again"));
        }
        Ok(GeneratedImage::new(
            ImageFactory::png(8, 8, [0, 0, 0xff, 0xff]),
            "image/png",
            "flaky",
        ))
    }
}
