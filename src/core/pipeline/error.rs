//! Per-item failure taxonomy

use thiserror::Error;

/// Failure of one item's pipeline. Fatal to that item, never to the run.
///
/// Cancellation is not an error and has no variant here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Describe stage failed and no fallback description was configured
    #[error("Describe failed: {0}")]
    Describe(String),

    /// Every generator in the chain failed
    #[error("Generate failed: {0}")]
    Generate(String),

    /// Generated image could not be normalized
    #[error("Post-process failed: {0}")]
    PostProcess(String),

    /// Storage collaborator rejected the artifact
    #[error("Persist failed: {0}")]
    Persist(String),

    /// Pipeline task panicked
    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn describe<S: Into<String>>(message: S) -> Self {
        Self::Describe(message.into())
    }

    pub fn generate<S: Into<String>>(message: S) -> Self {
        Self::Generate(message.into())
    }

    pub fn post_process<S: Into<String>>(message: S) -> Self {
        Self::PostProcess(message.into())
    }

    pub fn persist<S: Into<String>>(message: S) -> Self {
        Self::Persist(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stage name for logs
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Describe(_) => "describe",
            Self::Generate(_) => "generate",
            Self::PostProcess(_) => "post_process",
            Self::Persist(_) => "persist",
            Self::Internal(_) => "internal",
        }
    }
}
