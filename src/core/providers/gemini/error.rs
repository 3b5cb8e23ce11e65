//! Gemini error handling

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::ErrorMapper;
use serde_json::Value;

pub type GeminiError = ProviderError;

const PROVIDER: &str = "gemini";

/// Maps Gemini HTTP and API errors onto [`ProviderError`]
pub struct GeminiErrorMapper;

impl ErrorMapper for GeminiErrorMapper {
    fn map_http_error(&self, status_code: u16, response_body: &str) -> ProviderError {
        Self::from_http_status(status_code, response_body)
    }

    fn map_json_error(&self, _status_code: u16, body: &Value) -> ProviderError {
        Self::from_api_response(body)
    }
}

impl GeminiErrorMapper {
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if json.get("error").is_some() {
                return Self::from_api_response(&json);
            }
        }

        match status {
            429 => ProviderError::rate_limit(PROVIDER, Self::extract_retry_after(body)),
            500..=599 if status != 503 => {
                ProviderError::api_error(PROVIDER, status, format!("Server error: {}", body))
            }
            _ => ProviderError::from_http_status(PROVIDER, status, body),
        }
    }

    /// Map an `{"error": {...}}` body or a blocked candidate
    pub fn from_api_response(response: &Value) -> ProviderError {
        if let Some(error) = response.get("error") {
            let code = error
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            let status = error.get("status").and_then(Value::as_str).unwrap_or("");

            return match (code, status) {
                (401, _) | (_, "UNAUTHENTICATED") => ProviderError::authentication(PROVIDER, message),
                (403, _) | (_, "PERMISSION_DENIED") => {
                    ProviderError::authentication(PROVIDER, message)
                }
                (400, _) | (_, "INVALID_ARGUMENT") | (_, "FAILED_PRECONDITION") => {
                    ProviderError::invalid_request(PROVIDER, message)
                }
                (404, _) | (_, "NOT_FOUND") => ProviderError::model_not_found(PROVIDER, message),
                (429, _) | (_, "RESOURCE_EXHAUSTED") => ProviderError::RateLimit {
                    provider: PROVIDER,
                    message: message.to_string(),
                    retry_after: Self::extract_retry_after_from_error(error),
                },
                (503, _) | (_, "UNAVAILABLE") => {
                    ProviderError::provider_unavailable(PROVIDER, message)
                }
                _ => ProviderError::api_error(PROVIDER, code, message),
            };
        }

        if let Some(reason) = response
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
        {
            return gemini_safety_error(format!("prompt blocked ({})", reason));
        }

        if let Some(reason) = response
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
        {
            return match reason {
                "SAFETY" | "IMAGE_SAFETY" | "PROHIBITED_CONTENT" => {
                    gemini_safety_error(reason.to_string())
                }
                "RECITATION" => {
                    ProviderError::invalid_request(PROVIDER, "Content blocked due to recitation")
                }
                other => gemini_parse_error(format!(
                    "response has no usable content (finish reason {})",
                    other
                )),
            };
        }

        gemini_parse_error("response has no candidates")
    }

    fn extract_retry_after(body: &str) -> Option<u64> {
        let json = serde_json::from_str::<Value>(body).ok()?;
        match json.get("error") {
            Some(error) => Self::extract_retry_after_from_error(error),
            None => json.get("retry_after").and_then(Value::as_u64),
        }
    }

    /// `retry_after` on the error, or a `RetryInfo` detail such as `"30s"`
    fn extract_retry_after_from_error(error: &Value) -> Option<u64> {
        if let Some(retry_after) = error.get("retry_after").and_then(Value::as_u64) {
            return Some(retry_after);
        }

        error
            .get("details")?
            .as_array()?
            .iter()
            .filter_map(|detail| detail.get("retryDelay").and_then(Value::as_str))
            .find_map(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
            .map(|seconds| seconds.ceil() as u64)
    }
}

pub fn gemini_config_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::configuration(PROVIDER, msg)
}

pub fn gemini_network_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::network(PROVIDER, msg)
}

pub fn gemini_timeout_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::timeout(PROVIDER, msg)
}

pub fn gemini_parse_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::response_parsing(PROVIDER, msg)
}

pub fn gemini_safety_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::invalid_request(
        PROVIDER,
        format!("Content blocked by safety filters: {}", msg.into()),
    )
}
