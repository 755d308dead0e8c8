//! Local tesseract binary adapter.
//!
//! Stages the enhanced page as a PNG in the system temp directory, invokes
//! the binary in TSV mode and rebuilds both plain text and word tokens from
//! the one invocation. The TSV word boxes feed layout analysis; the
//! reconstructed text feeds fusion.

use crate::config::LocalEngineConfig;
use crate::engines::{EngineFailure, RecognitionEngine, RecognitionInput};
use crate::error::{Result, ScanweaveError};
use crate::types::{BoundingBox, EngineErrorKind, RecognitionResult, Token};
use async_trait::async_trait;
use image::ImageEncoder;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const LOCAL_ENGINE_ID: &str = "tesseract";

/// Word rows in tesseract TSV output carry this level.
const TSV_WORD_LEVEL: u32 = 5;
/// A complete TSV row has twelve fields; shorter rows are skipped.
const TSV_MIN_FIELDS: usize = 12;

/// RAII guard for the staged input image.
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        // Drop cannot be async; cleanup is spawned best-effort.
        let path = self.path.clone();
        tokio::spawn(async move {
            let _ = fs::remove_file(&path).await;
        });
    }
}

/// Adapter for a locally installed tesseract binary.
pub struct LocalEngine {
    config: LocalEngineConfig,
}

impl LocalEngine {
    pub fn new(config: LocalEngineConfig) -> Self {
        Self { config }
    }

    async fn run(
        &self,
        input: &RecognitionInput,
    ) -> std::result::Result<RecognitionResult, EngineFailure> {
        let temp_path = std::env::temp_dir().join(format!(
            "scanweave_page_{}_{}.png",
            std::process::id(),
            uuid::Uuid::new_v4(),
        ));
        let _temp_guard = TempFile::new(temp_path.clone());

        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(
                input.image.as_raw(),
                input.image.width(),
                input.image.height(),
                image::ExtendedColorType::L8,
            )
            .map_err(|e| {
                EngineFailure::new(
                    EngineErrorKind::Invocation,
                    format!("could not encode staged page: {}", e),
                )
            })?;

        fs::write(&temp_path, &png).await.map_err(|e| {
            EngineFailure::new(
                EngineErrorKind::Invocation,
                format!("could not stage page at {}: {}", temp_path.display(), e),
            )
        })?;

        let mut command = Command::new(&self.config.binary_path);
        command
            .arg(&temp_path)
            .arg("stdout")
            .args(["-l", &input.language])
            .args(["--oem", &self.config.oem.to_string()])
            .args(["--psm", &self.config.psm.to_string()]);
        if let Some(dir) = &self.config.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        command
            .arg("tsv")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            EngineFailure::new(
                EngineErrorKind::Invocation,
                format!("could not execute '{}': {}", self.config.binary_path, e),
            )
        })?;

        let output = match timeout(
            Duration::from_secs(self.config.timeout_seconds),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(EngineFailure::new(
                    EngineErrorKind::Invocation,
                    format!("could not collect tesseract output: {}", e),
                ));
            }
            Err(_) => {
                // Child is killed on drop of the consumed future.
                return Err(EngineFailure::new(
                    EngineErrorKind::Timeout,
                    format!("tesseract timed out after {}s", self.config.timeout_seconds),
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineFailure::new(
                EngineErrorKind::Invocation,
                format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let (text, tokens) = parse_tsv(&tsv);
        debug!("tesseract recognized {} words", tokens.len());

        Ok(RecognitionResult::success_with_tokens(LOCAL_ENGINE_ID, text, tokens))
    }
}

#[async_trait]
impl RecognitionEngine for LocalEngine {
    fn engine_id(&self) -> &str {
        LOCAL_ENGINE_ID
    }

    async fn recognize(&self, input: &RecognitionInput) -> RecognitionResult {
        match self.run(input).await {
            Ok(result) => result,
            Err(failure) => {
                warn!("local engine failed ({}): {}", failure.kind, failure.message);
                RecognitionResult::failure(LOCAL_ENGINE_ID, failure.kind)
            }
        }
    }
}

/// Check that the configured binary is present and executable.
///
/// Runs `<binary> --version`. A spawn failure, a timeout or a non-zero exit
/// all map to [`ScanweaveError::MissingDependency`].
pub async fn validate_binary(config: &LocalEngineConfig) -> Result<()> {
    let mut command = Command::new(&config.binary_path);
    command
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = timeout(Duration::from_secs(config.timeout_seconds), command.output())
        .await
        .map_err(|_| {
            ScanweaveError::MissingDependency(format!(
                "'{} --version' timed out after {}s",
                config.binary_path, config.timeout_seconds
            ))
        })?
        .map_err(|e| {
            ScanweaveError::MissingDependency(format!(
                "recognition binary '{}' cannot be run: {}",
                config.binary_path, e
            ))
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ScanweaveError::MissingDependency(format!(
            "'{} --version' exited with {}",
            config.binary_path, output.status
        )))
    }
}

/// Rebuild plain text and word tokens from tesseract TSV output.
///
/// Word rows within a line are joined with a space, a line change emits a
/// newline and a block or paragraph change emits a blank line, which matches
/// the binary's own plain-text rendering.
fn parse_tsv(tsv: &str) -> (String, Vec<Token>) {
    let mut text = String::new();
    let mut tokens = Vec::new();
    let mut previous: Option<(u32, u32, u32)> = None;

    for (line_num, line) in tsv.lines().enumerate() {
        if line_num == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let level = fields[0].parse::<u32>().unwrap_or(0);
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let conf = fields[10].parse::<f32>().unwrap_or(-1.0);
        if conf < 0.0 {
            continue;
        }

        let word = fields[11].trim();
        if word.is_empty() {
            continue;
        }

        let block = fields[2].parse::<u32>().unwrap_or(0);
        let par = fields[3].parse::<u32>().unwrap_or(0);
        let line_index = fields[4].parse::<u32>().unwrap_or(0);

        match previous {
            None => {}
            Some((prev_block, prev_par, _)) if prev_block != block || prev_par != par => {
                text.push_str("\n\n");
            }
            Some((_, _, prev_line)) if prev_line != line_index => {
                text.push('\n');
            }
            Some(_) => {
                text.push(' ');
            }
        }
        text.push_str(word);
        previous = Some((block, par, line_index));

        tokens.push(Token {
            text: word.to_string(),
            confidence: conf,
            bounding_box: BoundingBox {
                x: fields[6].parse().unwrap_or(0),
                y: fields[7].parse().unwrap_or(0),
                width: fields[8].parse().unwrap_or(0),
                height: fields[9].parse().unwrap_or(0),
            },
            block_index: block,
            line_index,
        });
    }

    (text, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_parse_tsv_words_and_boxes() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t100\t50\t80\t30\t95.5\tHola\n\
                   5\t1\t1\t1\t1\t2\t190\t50\t70\t30\t92.3\tmundo";

        let (text, tokens) = parse_tsv(tsv);
        assert_eq!(text, "Hola mundo");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Hola");
        assert_eq!(tokens[0].confidence, 95.5);
        assert_eq!(
            tokens[0].bounding_box,
            BoundingBox { x: 100, y: 50, width: 80, height: 30 }
        );
        assert_eq!(tokens[1].bounding_box.x, 190);
    }

    #[test]
    fn test_parse_tsv_line_breaks() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t90\tuno\n\
                   5\t1\t1\t1\t2\t1\t10\t40\t40\t20\t90\tdos\n\
                   5\t1\t2\t1\t1\t1\t10\t90\t40\t20\t90\ttres";

        let (text, _) = parse_tsv(tsv);
        assert_eq!(text, "uno\ndos\n\ntres");
    }

    #[test]
    fn test_parse_tsv_skips_structure_rows() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t\n\
                   2\t1\t1\t0\t0\t0\t10\t10\t300\t100\t-1\t\n\
                   4\t1\t1\t1\t1\t0\t10\t10\t300\t30\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t80\t30\t88\tsolo";

        let (text, tokens) = parse_tsv(tsv);
        assert_eq!(text, "solo");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_parse_tsv_skips_malformed_rows() {
        let tsv = "level\tpage_num\tblock_num\n\
                   not a tsv row\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t80\t30\t88\tbien";

        let (text, tokens) = parse_tsv(tsv);
        assert_eq!(text, "bien");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_parse_tsv_empty_output() {
        let (text, tokens) = parse_tsv("");
        assert!(text.is_empty());
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_parse_tsv_blank_word_dropped() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t80\t30\t88\t \n\
                   5\t1\t1\t1\t1\t2\t100\t10\t80\t30\t88\tpalabra";

        let (text, tokens) = parse_tsv(tsv);
        assert_eq!(text, "palabra");
        assert_eq!(tokens.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_binary_folds_into_invocation_failure() {
        let engine = LocalEngine::new(LocalEngineConfig {
            binary_path: "/nonexistent/scanweave-tesseract".to_string(),
            ..Default::default()
        });
        let input = RecognitionInput {
            image: Arc::new(image::GrayImage::from_pixel(8, 8, image::Luma([255u8]))),
            jpeg: Arc::new(Vec::new()),
            language: "spa".to_string(),
        };

        let result = engine.recognize(&input).await;
        assert!(!result.succeeded);
        assert_eq!(result.engine_id, LOCAL_ENGINE_ID);
        assert_eq!(result.error_kind, Some(EngineErrorKind::Invocation));
        assert!(result.text.is_empty());
    }

    #[tokio::test]
    async fn test_validate_binary_missing_is_missing_dependency() {
        let config = LocalEngineConfig {
            binary_path: "/nonexistent/scanweave-tesseract".to_string(),
            ..Default::default()
        };

        let result = validate_binary(&config).await;
        assert!(matches!(result, Err(ScanweaveError::MissingDependency(_))));
    }
}
