//! Configuration loading and management.
//!
//! Engine configuration is process-wide and read-only after startup: the
//! pipeline is constructed from a [`ScanweaveConfig`] once and never mutates
//! it. Configuration comes from a `scanweave.toml` (explicit path or ancestor
//! discovery), with environment variables overriding the credential and
//! binary-path fields.

use crate::{Result, ScanweaveError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level pipeline configuration.
///
/// # Example
///
/// ```rust
/// use scanweave::ScanweaveConfig;
///
/// let config = ScanweaveConfig::default();
/// assert_eq!(config.default_language, "spa");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanweaveConfig {
    /// Fallback recognition language when the requested codes are unavailable
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Local tesseract binary engine
    #[serde(default)]
    pub local: LocalEngineConfig,

    /// Cloud vision API engine
    #[serde(default)]
    pub cloud_vision: CloudVisionConfig,

    /// Third-party OCR web service engine
    #[serde(default)]
    pub web_service: WebServiceConfig,

    /// Text correction passes
    #[serde(default)]
    pub correction: CorrectionConfig,

    /// Maximum concurrent conversions in batch operations (None = num_cpus * 2)
    #[serde(default)]
    pub max_concurrent_conversions: Option<usize>,
}

/// Local OCR binary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    /// Register this engine with the orchestrator
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tesseract executable (resolved through PATH when not absolute)
    #[serde(default = "default_tesseract_binary")]
    pub binary_path: String,

    /// Language data directory passed as --tessdata-dir (None = binary default)
    #[serde(default)]
    pub tessdata_dir: Option<PathBuf>,

    /// OCR engine mode (--oem)
    #[serde(default = "default_oem")]
    pub oem: u8,

    /// Page segmentation mode (--psm); 6 assumes a uniform block of text
    #[serde(default = "default_psm")]
    pub psm: u8,

    /// Subprocess timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Cloud vision API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudVisionConfig {
    /// Register this engine with the orchestrator
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API key; None degrades the adapter to permanent failure
    #[serde(default)]
    pub api_key: Option<String>,

    /// Annotation endpoint
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// OCR web service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebServiceConfig {
    /// Register this engine with the orchestrator
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API key; the service's public demo key is the default
    #[serde(default = "default_web_api_key")]
    pub api_key: Option<String>,

    /// Parse endpoint
    #[serde(default = "default_web_endpoint")]
    pub endpoint: String,

    /// Fixed service-side language code (the service does not accept
    /// '+'-joined lists, so the request language is not forwarded)
    #[serde(default = "default_web_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Text correction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Run the correction passes at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum Jaro-Winkler similarity for a dictionary replacement
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Tokens at or below this length are never corrected
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
}

fn default_true() -> bool {
    true
}
fn default_language() -> String {
    "spa".to_string()
}
fn default_tesseract_binary() -> String {
    "tesseract".to_string()
}
fn default_oem() -> u8 {
    3
}
fn default_psm() -> u8 {
    6
}
fn default_timeout() -> u64 {
    30
}
fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}
fn default_web_api_key() -> Option<String> {
    Some("helloworld".to_string())
}
fn default_web_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}
fn default_web_language() -> String {
    "spa".to_string()
}
fn default_similarity_threshold() -> f64 {
    0.88
}
fn default_min_token_length() -> usize {
    3
}

impl Default for ScanweaveConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            local: LocalEngineConfig::default(),
            cloud_vision: CloudVisionConfig::default(),
            web_service: WebServiceConfig::default(),
            correction: CorrectionConfig::default(),
            max_concurrent_conversions: None,
        }
    }
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary_path: default_tesseract_binary(),
            tessdata_dir: None,
            oem: default_oem(),
            psm: default_psm(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CloudVisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: default_vision_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WebServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: default_web_api_key(),
            endpoint: default_web_endpoint(),
            language: default_web_language(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            similarity_threshold: default_similarity_threshold(),
            min_token_length: default_min_token_length(),
        }
    }
}

impl ScanweaveConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ScanweaveError::Config` if the file cannot be read or is
    /// invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScanweaveError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ScanweaveError::config(format!("Invalid TOML in {}: {}", path.as_ref().display(), e))
        })
    }

    /// Discover a `scanweave.toml` in the current directory or any parent.
    ///
    /// Returns `Ok(None)` when no config file exists anywhere up the tree.
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ScanweaveError::Io)?;

        loop {
            let candidate = current.join("scanweave.toml");
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load from an explicit path, or discover, or fall back to defaults,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::discover()?.unwrap_or_default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override credential and binary-path fields from the environment.
    ///
    /// Recognized variables: `SCANWEAVE_TESSERACT_PATH`,
    /// `SCANWEAVE_TESSDATA_DIR`, `SCANWEAVE_VISION_API_KEY`,
    /// `SCANWEAVE_OCRSPACE_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SCANWEAVE_TESSERACT_PATH")
            && !path.is_empty()
        {
            self.local.binary_path = path;
        }
        if let Ok(dir) = std::env::var("SCANWEAVE_TESSDATA_DIR")
            && !dir.is_empty()
        {
            self.local.tessdata_dir = Some(PathBuf::from(dir));
        }
        if let Ok(key) = std::env::var("SCANWEAVE_VISION_API_KEY")
            && !key.is_empty()
        {
            self.cloud_vision.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("SCANWEAVE_OCRSPACE_API_KEY")
            && !key.is_empty()
        {
            self.web_service.api_key = Some(key);
        }
    }

    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns `ScanweaveError::Config` for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.local.psm > 13 {
            return Err(ScanweaveError::config(format!(
                "Invalid psm {}: must be 0-13",
                self.local.psm
            )));
        }
        if self.local.oem > 3 {
            return Err(ScanweaveError::config(format!(
                "Invalid oem {}: must be 0-3",
                self.local.oem
            )));
        }
        for (name, timeout) in [
            ("local", self.local.timeout_seconds),
            ("cloud_vision", self.cloud_vision.timeout_seconds),
            ("web_service", self.web_service.timeout_seconds),
        ] {
            if timeout == 0 {
                return Err(ScanweaveError::config(format!(
                    "Invalid {} timeout: must be at least 1 second",
                    name
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.correction.similarity_threshold) {
            return Err(ScanweaveError::config(format!(
                "Invalid similarity_threshold {}: must be within 0.0-1.0",
                self.correction.similarity_threshold
            )));
        }
        if self.default_language.trim().is_empty() {
            return Err(ScanweaveError::config("default_language must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ScanweaveConfig::default();
        assert_eq!(config.default_language, "spa");
        assert!(config.local.enabled);
        assert_eq!(config.local.binary_path, "tesseract");
        assert_eq!(config.local.oem, 3);
        assert_eq!(config.local.psm, 6);
        assert!(config.cloud_vision.enabled);
        assert!(config.cloud_vision.api_key.is_none());
        assert_eq!(config.web_service.api_key.as_deref(), Some("helloworld"));
        assert_eq!(config.web_service.language, "spa");
        assert!(config.correction.enabled);
        assert_eq!(config.correction.min_token_length, 3);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("scanweave.toml");

        fs::write(
            &config_path,
            r#"
default_language = "eng"

[local]
binary_path = "/usr/local/bin/tesseract"
timeout_seconds = 10

[cloud_vision]
api_key = "test-key"

[correction]
enabled = false
        "#,
        )
        .unwrap();

        let config = ScanweaveConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.default_language, "eng");
        assert_eq!(config.local.binary_path, "/usr/local/bin/tesseract");
        assert_eq!(config.local.timeout_seconds, 10);
        assert_eq!(config.cloud_vision.api_key.as_deref(), Some("test-key"));
        assert!(!config.correction.enabled);
        // untouched sections keep defaults
        assert_eq!(config.web_service.language, "spa");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = ScanweaveConfig::from_toml_file("/nonexistent/scanweave.toml");
        assert!(matches!(result, Err(ScanweaveError::Config { .. })));
    }

    #[test]
    fn test_from_toml_file_invalid() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("scanweave.toml");
        fs::write(&config_path, "not [ valid { toml").unwrap();

        let result = ScanweaveConfig::from_toml_file(&config_path);
        assert!(matches!(result, Err(ScanweaveError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_psm() {
        let config = ScanweaveConfig {
            local: LocalEngineConfig {
                psm: 14,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ScanweaveConfig {
            web_service: WebServiceConfig {
                timeout_seconds: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = ScanweaveConfig {
            correction: CorrectionConfig {
                similarity_threshold: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(ScanweaveConfig::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("SCANWEAVE_TESSERACT_PATH", "/opt/tesseract/bin/tesseract");
            std::env::set_var("SCANWEAVE_VISION_API_KEY", "vision-secret");
            std::env::set_var("SCANWEAVE_OCRSPACE_API_KEY", "space-secret");
        }

        let mut config = ScanweaveConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.local.binary_path, "/opt/tesseract/bin/tesseract");
        assert_eq!(config.cloud_vision.api_key.as_deref(), Some("vision-secret"));
        assert_eq!(config.web_service.api_key.as_deref(), Some("space-secret"));

        unsafe {
            std::env::remove_var("SCANWEAVE_TESSERACT_PATH");
            std::env::remove_var("SCANWEAVE_VISION_API_KEY");
            std::env::remove_var("SCANWEAVE_OCRSPACE_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_env_override_empty_value_ignored() {
        unsafe {
            std::env::set_var("SCANWEAVE_TESSERACT_PATH", "");
        }

        let mut config = ScanweaveConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.local.binary_path, "tesseract");

        unsafe {
            std::env::remove_var("SCANWEAVE_TESSERACT_PATH");
        }
    }
}
