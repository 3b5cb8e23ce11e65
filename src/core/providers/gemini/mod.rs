//! Google Gemini provider
//!
//! Image generation through `generateContent` on an image-capable model, and
//! image description through a multimodal text model. Both use the Google AI
//! Studio REST surface with an API key.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use error::{GeminiError, GeminiErrorMapper};
pub use provider::GeminiProvider;

/// Create a provider from `GEMINI_API_KEY` / `GOOGLE_API_KEY`
pub fn create_gemini_provider_from_env() -> Result<GeminiProvider, GeminiError> {
    let config = GeminiConfig::from_env()?;
    GeminiProvider::new(config)
}
