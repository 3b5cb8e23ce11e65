//! Gemini HTTP client

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;

use super::config::GeminiConfig;
use super::error::{
    GeminiErrorMapper, gemini_config_error, gemini_network_error, gemini_parse_error,
    gemini_timeout_error,
};
use crate::core::providers::unified_provider::ProviderError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        config.validate()?;

        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| gemini_network_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// POST a `generateContent` request and return the parsed response
    pub async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, ProviderError> {
        let url = self.config.get_endpoint(model, "generateContent");
        let headers = self.build_headers()?;

        if self.config.debug {
            tracing::debug!("Gemini request URL: {}", url);
        }

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    gemini_timeout_error(format!("Request timed out after {}s", self.config.request_timeout))
                } else {
                    gemini_network_error(format!("Network error: {}", e))
                }
            })?;

        self.handle_response(response).await
    }

    fn build_headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| gemini_config_error(format!("Invalid API key format: {}", e)))?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        Ok(headers)
    }

    async fn handle_response(&self, response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| gemini_network_error(format!("Failed to read response: {}", e)))?;

        if self.config.debug {
            tracing::debug!(
                "Gemini response status: {} ({} bytes)",
                status,
                response_text.len()
            );
        }

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let json_response: Value = serde_json::from_str(&response_text)
            .map_err(|e| gemini_parse_error(format!("Failed to parse response JSON: {}", e)))?;

        if json_response.get("error").is_some() {
            return Err(GeminiErrorMapper::from_api_response(&json_response));
        }

        Ok(json_response)
    }
}
