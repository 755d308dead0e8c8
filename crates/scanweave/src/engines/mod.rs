//! Recognition engine adapters.
//!
//! Each adapter wraps one engine behind [`RecognitionEngine`]. Adapters fold
//! every failure mode (timeout, transport error, unparseable response) into a
//! failed [`RecognitionResult`] carrying an [`EngineErrorKind`], so a broken
//! engine can never abort a conversion. The orchestrator only ever sees
//! values.
//!
//! [`EngineErrorKind`]: crate::types::EngineErrorKind

pub mod cloud_vision;
pub mod local;
pub mod web_service;

pub use cloud_vision::CloudVisionEngine;
pub use local::LocalEngine;
pub use web_service::WebServiceEngine;

use crate::types::RecognitionResult;
use async_trait::async_trait;
use image::GrayImage;
use std::sync::Arc;

/// Per-conversion input shared by every adapter.
///
/// Both bitmaps are produced once by the pipeline and handed out behind
/// `Arc`s; adapters must not re-enhance or re-encode.
#[derive(Clone)]
pub struct RecognitionInput {
    /// Enhanced, binarized page, for the local engine.
    pub image: Arc<GrayImage>,
    /// JPEG encoding of the original scan, for the network engines, which
    /// run their own preprocessing.
    pub jpeg: Arc<Vec<u8>>,
    /// Validated '+'-joined language codes.
    pub language: String,
}

/// Internal adapter failure, folded into a failed result at the trait
/// boundary.
pub(crate) struct EngineFailure {
    pub(crate) kind: crate::types::EngineErrorKind,
    pub(crate) message: String,
}

impl EngineFailure {
    pub(crate) fn new(kind: crate::types::EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Map a transport error onto the failure taxonomy.
pub(crate) fn classify_transport_error(e: &reqwest::Error) -> crate::types::EngineErrorKind {
    if e.is_timeout() {
        crate::types::EngineErrorKind::Timeout
    } else if e.is_decode() {
        crate::types::EngineErrorKind::MalformedResponse
    } else {
        crate::types::EngineErrorKind::Network
    }
}

/// One recognition engine.
///
/// Implementations must be `Send + Sync`; the orchestrator runs all
/// registered engines concurrently over the same input.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Stable identifier used in logs, fusion reporting and configuration.
    fn engine_id(&self) -> &str;

    /// Run recognition over one enhanced page.
    ///
    /// Infallible by contract: every internal error is converted into a
    /// failed result with the appropriate error kind.
    async fn recognize(&self, input: &RecognitionInput) -> RecognitionResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineErrorKind;

    struct FixedEngine {
        id: &'static str,
        text: &'static str,
    }

    #[async_trait]
    impl RecognitionEngine for FixedEngine {
        fn engine_id(&self) -> &str {
            self.id
        }

        async fn recognize(&self, _input: &RecognitionInput) -> RecognitionResult {
            RecognitionResult::success(self.id, self.text)
        }
    }

    fn blank_input() -> RecognitionInput {
        RecognitionInput {
            image: Arc::new(GrayImage::from_pixel(4, 4, image::Luma([255u8]))),
            jpeg: Arc::new(Vec::new()),
            language: "spa".to_string(),
        }
    }

    #[tokio::test]
    async fn test_engine_produces_result_with_its_id() {
        let engine = FixedEngine { id: "fixed", text: "hola" };
        let result = engine.recognize(&blank_input()).await;
        assert_eq!(result.engine_id, "fixed");
        assert_eq!(result.text, "hola");
        assert!(result.succeeded);
    }

    #[tokio::test]
    async fn test_engines_are_object_safe() {
        let engines: Vec<Box<dyn RecognitionEngine>> = vec![
            Box::new(FixedEngine { id: "a", text: "uno" }),
            Box::new(FixedEngine { id: "b", text: "dos" }),
        ];
        let input = blank_input();
        for engine in &engines {
            let result = engine.recognize(&input).await;
            assert!(result.succeeded);
            assert!(result.error_kind.is_none());
        }
    }

    #[test]
    fn test_failure_results_never_contribute() {
        let result = RecognitionResult::failure("fixed", EngineErrorKind::Timeout);
        assert!(!result.contributes());
    }
}
