//! Google Cloud Vision adapter.
//!
//! Calls the `images:annotate` REST endpoint with a base64-encoded JPEG and
//! a `TEXT_DETECTION` feature request. The first text annotation carries the
//! full recognized page; an absent annotation list is an empty success, not
//! a failure.

use crate::config::CloudVisionConfig;
use crate::engines::{EngineFailure, RecognitionEngine, RecognitionInput, classify_transport_error};
use crate::error::{Result, ScanweaveError};
use crate::types::{EngineErrorKind, RecognitionResult};
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const CLOUD_VISION_ENGINE_ID: &str = "google-vision";

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    /// Base64-encoded JPEG bytes.
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
struct AnnotateImageResponse {
    #[serde(rename = "textAnnotations", default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// Adapter for the Google Cloud Vision REST API.
pub struct CloudVisionEngine {
    config: CloudVisionConfig,
    client: reqwest::Client,
}

impl CloudVisionEngine {
    pub fn new(config: CloudVisionConfig) -> Result<Self> {
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

        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(input.jpeg.as_slice()),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION",
                }],
            }],
        };

        let url = format!("{}?key={}", self.config.endpoint, api_key);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                EngineFailure::new(classify_transport_error(&e), format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineFailure::new(
                EngineErrorKind::ServiceError,
                format!("annotate returned {}: {}", status, truncate(&detail, 200)),
            ));
        }

        let parsed: AnnotateResponse = response.json().await.map_err(|e| {
            EngineFailure::new(
                EngineErrorKind::MalformedResponse,
                format!("could not parse annotate response: {}", e),
            )
        })?;

        let Some(page) = parsed.responses.into_iter().next() else {
            return Err(EngineFailure::new(
                EngineErrorKind::MalformedResponse,
                "annotate response carried no entries",
            ));
        };

        if let Some(error) = page.error {
            return Err(EngineFailure::new(
                EngineErrorKind::ServiceError,
                format!("annotate error {}: {}", error.code, error.message),
            ));
        }

        // The first annotation is the whole-page text; the rest are per-word.
        let text = page
            .text_annotations
            .into_iter()
            .next()
            .map(|annotation| annotation.description)
            .unwrap_or_default();

        debug!("cloud vision recognized {} characters", text.chars().count());
        Ok(RecognitionResult::success(CLOUD_VISION_ENGINE_ID, text))
    }
}

#[async_trait]
impl RecognitionEngine for CloudVisionEngine {
    fn engine_id(&self) -> &str {
        CLOUD_VISION_ENGINE_ID
    }

    async fn recognize(&self, input: &RecognitionInput) -> RecognitionResult {
        match self.run(input).await {
            Ok(result) => result,
            Err(failure) => {
                warn!("cloud vision failed ({}): {}", failure.kind, failure.message);
                RecognitionResult::failure(CLOUD_VISION_ENGINE_ID, failure.kind)
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
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
        let engine = CloudVisionEngine::new(CloudVisionConfig {
            api_key: None,
            ..Default::default()
        })
        .unwrap();

        let result = engine.recognize(&input()).await;
        assert!(!result.succeeded);
        assert_eq!(result.error_kind, Some(EngineErrorKind::MissingCredential));
    }

    #[tokio::test]
    async fn test_empty_api_key_fails_without_network() {
        let engine = CloudVisionEngine::new(CloudVisionConfig {
            api_key: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        let result = engine.recognize(&input()).await;
        assert_eq!(result.error_kind, Some(EngineErrorKind::MissingCredential));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_classified_as_network() {
        let engine = CloudVisionEngine::new(CloudVisionConfig {
            api_key: Some("key".to_string()),
            endpoint: "http://127.0.0.1:1/v1/images:annotate".to_string(),
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
    fn test_parse_annotate_response_with_text() {
        let json = r#"{
            "responses": [{
                "textAnnotations": [
                    {"description": "Hola mundo\ncompleto"},
                    {"description": "Hola"},
                    {"description": "mundo"}
                ]
            }]
        }"#;

        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.responses.len(), 1);
        assert_eq!(
            parsed.responses[0].text_annotations[0].description,
            "Hola mundo\ncompleto"
        );
    }

    #[test]
    fn test_parse_annotate_response_no_text() {
        let json = r#"{"responses": [{}]}"#;
        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.responses[0].text_annotations.is_empty());
        assert!(parsed.responses[0].error.is_none());
    }

    #[test]
    fn test_parse_annotate_response_error() {
        let json = r#"{
            "responses": [{
                "error": {"code": 7, "message": "permission denied"}
            }]
        }"#;

        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        let error = parsed.responses[0].error.as_ref().unwrap();
        assert_eq!(error.code, 7);
        assert_eq!(error.message, "permission denied");
    }

    #[test]
    fn test_request_serializes_in_wire_shape() {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: "YWJj".to_string(),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION",
                }],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(json["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("ééé", 2), "éé");
    }
}
