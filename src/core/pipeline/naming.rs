//! Artifact naming
//!
//! Names are `{prefix}_{unix_millis}_{sequence:06}_{random8}.{ext}`. The
//! sequence is a per-namer atomic counter, so two calls on the same namer never
//! collide even within one millisecond; the random suffix separates namers and
//! processes, which is probabilistic only.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub const DEFAULT_NAME_PREFIX: &str = "NB_PRO";

#[derive(Debug)]
pub struct ArtifactNamer {
    prefix: String,
    sequence: AtomicU64,
}

impl ArtifactNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next unique name with the given extension (without the dot)
    pub fn next(&self, extension: &str) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = chrono::Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        format!(
            "{}_{}_{:06}_{}.{}",
            self.prefix,
            millis,
            sequence,
            &random[..8],
            extension
        )
    }
}

impl Default for ArtifactNamer {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PREFIX)
    }
}
