//! Error types for scanweave.
//!
//! All fallible operations in the library return [`Result`]. The pipeline is
//! deliberately hard to kill: recognition engines convert their own failures
//! into failed results (never errors), and the corrector falls back to less
//! corrected text. Only three conditions abort a conversion:
//!
//! - `ImageLoad` - the input bitmap cannot be decoded, so no engine can run
//! - `UnsupportedFormat` - the requested output kind is not in the supported
//!   set, rejected before any recognition work starts
//! - `MissingDependency` - the local binary cannot be executed and no other
//!   engine is enabled, rejected when the pipeline is built
//!
//! Everything else (`Engine`, `Correction`, `Config` defaults) degrades to
//! less complete output with a log line.
use thiserror::Error;

/// Result type alias using `ScanweaveError`.
pub type Result<T> = std::result::Result<T, ScanweaveError>;

/// Main error type for all scanweave operations.
#[derive(Debug, Error)]
pub enum ScanweaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image load error: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Engine error: {message}")]
    Engine {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Correction error: {message}")]
    Correction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<image::ImageError> for ScanweaveError {
    fn from(err: image::ImageError) -> Self {
        ScanweaveError::ImageLoad {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl ScanweaveError {
    error_constructor!(image_load, ImageLoad);
    error_constructor!(engine, Engine);
    error_constructor!(correction, Correction);
    error_constructor!(config, Config);
    error_constructor!(validation, Validation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ScanweaveError = io_err.into();
        assert!(matches!(err, ScanweaveError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_image_load_error() {
        let err = ScanweaveError::image_load("corrupt bitmap");
        assert_eq!(err.to_string(), "Image load error: corrupt bitmap");
    }

    #[test]
    fn test_image_load_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = ScanweaveError::image_load_with_source("corrupt bitmap", source);
        assert_eq!(err.to_string(), "Image load error: corrupt bitmap");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_engine_error() {
        let err = ScanweaveError::engine("tesseract exited with status 1");
        assert_eq!(err.to_string(), "Engine error: tesseract exited with status 1");
    }

    #[test]
    fn test_engine_error_with_source() {
        let source = std::io::Error::other("connection refused");
        let err = ScanweaveError::engine_with_source("request failed", source);
        assert_eq!(err.to_string(), "Engine error: request failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_correction_error() {
        let err = ScanweaveError::correction("phrase pass produced empty output");
        assert_eq!(err.to_string(), "Correction error: phrase pass produced empty output");
    }

    #[test]
    fn test_config_error() {
        let err = ScanweaveError::config("invalid timeout");
        assert_eq!(err.to_string(), "Config error: invalid timeout");
    }

    #[test]
    fn test_validation_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad param");
        let err = ScanweaveError::validation_with_source("invalid language", source);
        assert_eq!(err.to_string(), "Validation error: invalid language");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_dependency_error() {
        let err = ScanweaveError::MissingDependency("tesseract not found".to_string());
        assert_eq!(err.to_string(), "Missing dependency: tesseract not found");
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = ScanweaveError::UnsupportedFormat("pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported format: pdf");
    }

    #[test]
    fn test_image_error_conversion() {
        let img_err = image::ImageError::Unsupported(image::error::UnsupportedError::from_format_and_kind(
            image::error::ImageFormatHint::Unknown,
            image::error::UnsupportedErrorKind::GenericFeature("unknown codec".to_string()),
        ));
        let err: ScanweaveError = img_err.into();
        assert!(matches!(err, ScanweaveError::ImageLoad { .. }));
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_file() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/scanweave-test.txt")?;
            Ok(content)
        }

        let result = read_file();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ScanweaveError::Io(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = ScanweaveError::validation("test");
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Validation"));
    }
}
