//! Gemini image generator and describer

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::debug;

use super::client::GeminiClient;
use super::config::GeminiConfig;
use super::error::{GeminiErrorMapper, gemini_parse_error};
use crate::core::batch::BatchItem;
use crate::core::pipeline::ImageItem;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::{Describer, GeneratedImage, ImageGenerator};

/// Instruction sent with the input image when describing it
pub const DESCRIBE_INSTRUCTION: &str = "Describe the product shown in this image in one or two \
    sentences: what it is, its color, material and shape. Do not describe the background.";

/// Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: GeminiClient::new(config)?,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        self.client.config()
    }

    /// Request body asking for an image
    pub fn image_request(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            }
        })
    }

    /// Request body carrying the input image inline
    pub fn describe_request(item: &ImageItem) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": item.mime_type(),
                            "data": STANDARD.encode(item.bytes())
                        }
                    },
                    { "text": DESCRIBE_INSTRUCTION }
                ]
            }]
        })
    }

    /// First inline image part of the first candidate
    pub fn extract_image(response: &Value) -> Result<GeneratedImage, ProviderError> {
        let Some(parts) = candidate_parts(response) else {
            return Err(GeminiErrorMapper::from_api_response(response));
        };

        let inline = parts
            .iter()
            .filter_map(|part| part.get("inlineData").or_else(|| part.get("inline_data")))
            .find(|inline| inline.get("data").and_then(Value::as_str).is_some());

        let Some(inline) = inline else {
            return Err(gemini_parse_error("response contains no image part"));
        };

        let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)
            .unwrap_or("image/png");

        let bytes = STANDARD
            .decode(data)
            .map_err(|e| gemini_parse_error(format!("invalid base64 image data: {}", e)))?;

        Ok(GeneratedImage::new(bytes, mime_type, "gemini"))
    }

    /// Concatenated text parts of the first candidate
    pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
        let Some(parts) = candidate_parts(response) else {
            return Err(GeminiErrorMapper::from_api_response(response));
        };

        let text = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(gemini_parse_error("response contains no text"));
        }
        Ok(text)
    }
}

fn candidate_parts(response: &Value) -> Option<&Vec<Value>> {
    response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
}

#[async_trait]
impl ImageGenerator for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let model = &self.config().image_model;
        debug!("Requesting image from {}", model);

        let response = self
            .client
            .generate_content(model, &Self::image_request(prompt))
            .await?;
        Self::extract_image(&response)
    }
}

#[async_trait]
impl Describer for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn describe(&self, item: &ImageItem) -> Result<String, ProviderError> {
        let model = &self.config().text_model;
        debug!("Describing {} with {}", item.id(), model);

        let response = self
            .client
            .generate_content(model, &Self::describe_request(item))
            .await?;
        Self::extract_text(&response)
    }
}
