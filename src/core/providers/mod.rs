//! Describe and generate collaborators
//!
//! Every backend implements [`ImageGenerator`](crate::core::traits::ImageGenerator)
//! and optionally [`Describer`](crate::core::traits::Describer). Failures are
//! reported as the unified [`ProviderError`].

pub mod chain;
pub mod factory;
pub mod gemini;
pub mod http_image;
pub mod mock;
pub mod unified_provider;

pub use chain::GeneratorChain;
pub use factory::{build_generator_chain, create_describer, create_generator};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use http_image::{HttpImageKind, HttpImageProvider};
pub use mock::{MockDescriber, MockImageProvider};
pub use unified_provider::ProviderError;
