//! OCR.space web service adapter.
//!
//! Uploads the original scan as a JPEG multipart part. The service speaks a
//! PascalCase JSON dialect and can report errors either as one string or as
//! a list, so the response types absorb both shapes.

use crate::config::WebServiceConfig;
use crate::engines::{EngineFailure, RecognitionEngine, RecognitionInput, classify_transport_error};
use crate::error::{Result, ScanweaveError};
use crate::types::{EngineErrorKind, RecognitionResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const WEB_SERVICE_ENGINE_ID: &str = "ocr-space";

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn joined(&self) -> String {
        match self {
            ErrorMessage::One(message) => message.clone(),
            ErrorMessage::Many(messages) => messages.join("; "),
        }
    }
}

/// Adapter for the OCR.space `parse/image` endpoint.
pub struct WebServiceEngine {
    config: WebServiceConfig,
    client: reqwest::Client,
}

impl WebServiceEngine {
    pub fn new(config: WebServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ScanweaveError::engine_with_source("could not create HTTP client", e))?;
        Ok(Self { config, client })
    }

    async fn run(
        &self,
        input: &RecognitionInput,
    ) -> std::result::Result<RecognitionResult, EngineFailure> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                EngineFailure::new(EngineErrorKind::MissingCredential, "no API key configured")
            })?;

        let part = reqwest::multipart::Part::bytes(input.jpeg.as_slice().to_vec())
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| {
                EngineFailure::new(
                    EngineErrorKind::Invocation,
                    format!("could not build upload part: {}", e),
                )
            })?;
        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("apikey", api_key.to_string())
            .text("language", self.config.language.clone());

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                EngineFailure::new(classify_transport_error(&e), format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineFailure::new(
                EngineErrorKind::ServiceError,
                format!("parse endpoint returned {}", status),
            ));
        }

        let parsed: ParseResponse = response.json().await.map_err(|e| {
            EngineFailure::new(
                EngineErrorKind::MalformedResponse,
                format!("could not parse response: {}", e),
            )
        })?;

        if parsed.is_errored_on_processing {
            let detail = parsed
                .error_message
                .map(|m| m.joined())
                .unwrap_or_else(|| "unspecified processing error".to_string());
            return Err(EngineFailure::new(EngineErrorKind::ServiceError, detail));
        }

        let text = parsed
            .parsed_results
            .into_iter()
            .next()
            .map(|result| result.parsed_text)
            .unwrap_or_default();

        debug!("web service recognized {} characters", text.chars().count());
        Ok(RecognitionResult::success(WEB_SERVICE_ENGINE_ID, text))
    }
}

#[async_trait]
impl RecognitionEngine for WebServiceEngine {
    fn engine_id(&self) -> &str {
        WEB_SERVICE_ENGINE_ID
    }

    async fn recognize(&self, input: &RecognitionInput) -> RecognitionResult {
        match self.run(input).await {
            Ok(result) => result,
            Err(failure) => {
                warn!("web service failed ({}): {}", failure.kind, failure.message);
                RecognitionResult::failure(WEB_SERVICE_ENGINE_ID, failure.kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use std::sync::Arc;

    fn input() -> RecognitionInput {
        RecognitionInput {
            image: Arc::new(GrayImage::from_pixel(4, 4, image::Luma([255u8]))),
            jpeg: Arc::new(vec![0xFF, 0xD8, 0xFF, 0xD9]),
            language: "spa".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let engine = WebServiceEngine::new(WebServiceConfig {
            api_key: None,
            ..Default::default()
        })
        .unwrap();

        let result = engine.recognize(&input()).await;
        assert!(!result.succeeded);
        assert_eq!(result.error_kind, Some(EngineErrorKind::MissingCredential));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_classified_as_network() {
        let engine = WebServiceEngine::new(WebServiceConfig {
            endpoint: "http://127.0.0.1:1/parse/image".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        })
        .unwrap();

        let result = engine.recognize(&input()).await;
        assert!(!result.succeeded);
        assert!(matches!(
            result.error_kind,
            Some(EngineErrorKind::Network) | Some(EngineErrorKind::Timeout)
        ));
    }

    #[test]
    fn test_parse_response_with_text() {
        let json = r#"{
            "ParsedResults": [{"ParsedText": "Factura 2024\r\nTotal"}],
            "IsErroredOnProcessing": false
        }"#;

        let parsed: ParseResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_errored_on_processing);
        assert_eq!(parsed.parsed_results[0].parsed_text, "Factura 2024\r\nTotal");
    }

    #[test]
    fn test_parse_response_without_results() {
        let json = r#"{"IsErroredOnProcessing": false}"#;
        let parsed: ParseResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.parsed_results.is_empty());
    }

    #[test]
    fn test_parse_response_error_as_string() {
        let json = r#"{
            "IsErroredOnProcessing": true,
            "ErrorMessage": "Invalid API key"
        }"#;

        let parsed: ParseResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.is_errored_on_processing);
        assert_eq!(parsed.error_message.unwrap().joined(), "Invalid API key");
    }

    #[test]
    fn test_parse_response_error_as_list() {
        let json = r#"{
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Timed out", "Engine busy"]
        }"#;

        let parsed: ParseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.error_message.unwrap().joined(),
            "Timed out; Engine busy"
        );
    }

    #[test]
    fn test_default_key_present_in_default_config() {
        let config = WebServiceConfig::default();
        assert_eq!(config.api_key.as_deref(), Some("helloworld"));
        assert_eq!(config.language, "spa");
    }
}
