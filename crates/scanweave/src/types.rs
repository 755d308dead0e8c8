use serde::{Deserialize, Serialize};

use crate::error::ScanweaveError;

/// Separator inserted between engine segments in fused text.
///
/// Visible in the merged output so a reviewer can tell which engine
/// contributed which block.
pub const SEGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Pixel-space rectangle of a recognized word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One recognized word from a layout-capable engine.
///
/// Order within a result follows reading order as reported by the engine.
/// Confidence is the engine's 0-100 score for the word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
    pub block_index: u32,
    pub line_index: u32,
}

/// Why an engine contributed nothing to fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    /// The adapter's timeout elapsed before the engine answered.
    Timeout,
    /// Connection or transport failure talking to a remote service.
    Network,
    /// The engine answered with something the adapter could not parse.
    MalformedResponse,
    /// The adapter has no credential configured and is permanently down.
    MissingCredential,
    /// The local binary could not be spawned or exited non-zero.
    Invocation,
    /// The remote service reported an application-level error.
    ServiceError,
}

impl std::fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EngineErrorKind::Timeout => "timeout",
            EngineErrorKind::Network => "network",
            EngineErrorKind::MalformedResponse => "malformed response",
            EngineErrorKind::MissingCredential => "missing credential",
            EngineErrorKind::Invocation => "invocation failure",
            EngineErrorKind::ServiceError => "service error",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one engine adapter call.
///
/// Adapters never return errors to the orchestrator. Every failure mode is
/// folded into `succeeded: false` with an [`EngineErrorKind`] and empty text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub engine_id: String,
    pub text: String,
    pub tokens: Vec<Token>,
    pub succeeded: bool,
    pub error_kind: Option<EngineErrorKind>,
}

impl RecognitionResult {
    pub fn success(engine_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            text: text.into(),
            tokens: Vec::new(),
            succeeded: true,
            error_kind: None,
        }
    }

    pub fn success_with_tokens(
        engine_id: impl Into<String>,
        text: impl Into<String>,
        tokens: Vec<Token>,
    ) -> Self {
        Self {
            engine_id: engine_id.into(),
            text: text.into(),
            tokens,
            succeeded: true,
            error_kind: None,
        }
    }

    pub fn failure(engine_id: impl Into<String>, kind: EngineErrorKind) -> Self {
        Self {
            engine_id: engine_id.into(),
            text: String::new(),
            tokens: Vec::new(),
            succeeded: false,
            error_kind: Some(kind),
        }
    }

    /// True when this result contributes a segment to fusion.
    pub fn contributes(&self) -> bool {
        self.succeeded && !self.text.trim().is_empty()
    }
}

/// Row/column structure inferred from recognized text.
///
/// Rows are independent and may have different cell counts; no rectangularity
/// is forced and no column alignment is inferred across rows. Cells that trim
/// to empty are dropped, never padded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when no row carries any cell.
    pub fn has_no_cells(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }
}

/// Supported output artifact kinds (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    PlainText,
    Document,
    Spreadsheet,
}

impl OutputKind {
    /// File extension for artifacts of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::PlainText => "txt",
            OutputKind::Document => "md",
            OutputKind::Spreadsheet => "csv",
        }
    }
}

impl std::str::FromStr for OutputKind {
    type Err = ScanweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain-text" => Ok(OutputKind::PlainText),
            "doc" | "document" | "md" => Ok(OutputKind::Document),
            "csv" | "sheet" | "spreadsheet" => Ok(OutputKind::Spreadsheet),
            other => Err(ScanweaveError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputKind::PlainText => "plain-text",
            OutputKind::Document => "document",
            OutputKind::Spreadsheet => "spreadsheet",
        };
        write!(f, "{}", s)
    }
}

/// Result of one end-to-end pipeline invocation.
///
/// `table` is populated only for spreadsheet output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub text: String,
    pub table: Option<TableGrid>,
    /// Per-engine outcomes in registration order, for reporting.
    pub engine_results: Vec<EngineOutcome>,
}

/// Slimmed-down engine outcome kept on the pipeline output for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutcome {
    pub engine_id: String,
    pub succeeded: bool,
    pub error_kind: Option<EngineErrorKind>,
    pub characters: usize,
}

impl From<&RecognitionResult> for EngineOutcome {
    fn from(result: &RecognitionResult) -> Self {
        Self {
            engine_id: result.engine_id.clone(),
            succeeded: result.succeeded,
            error_kind: result.error_kind,
            characters: result.text.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_output_kind_aliases() {
        let cases = [
            ("txt", OutputKind::PlainText),
            ("text", OutputKind::PlainText),
            ("plain-text", OutputKind::PlainText),
            ("doc", OutputKind::Document),
            ("document", OutputKind::Document),
            ("md", OutputKind::Document),
            ("csv", OutputKind::Spreadsheet),
            ("sheet", OutputKind::Spreadsheet),
            ("spreadsheet", OutputKind::Spreadsheet),
        ];

        for (input, expected) in cases {
            assert_eq!(OutputKind::from_str(input).unwrap(), expected);
        }
    }

    #[test]
    fn test_output_kind_case_insensitive() {
        assert_eq!(OutputKind::from_str("TXT").unwrap(), OutputKind::PlainText);
        assert_eq!(OutputKind::from_str(" Csv ").unwrap(), OutputKind::Spreadsheet);
    }

    #[test]
    fn test_output_kind_rejects_unknown() {
        let result = OutputKind::from_str("docx");
        assert!(matches!(result, Err(ScanweaveError::UnsupportedFormat(_))));
        assert!(result.unwrap_err().to_string().contains("docx"));
    }

    #[test]
    fn test_output_kind_extension() {
        assert_eq!(OutputKind::PlainText.extension(), "txt");
        assert_eq!(OutputKind::Document.extension(), "md");
        assert_eq!(OutputKind::Spreadsheet.extension(), "csv");
    }

    #[test]
    fn test_recognition_result_success() {
        let result = RecognitionResult::success("tesseract", "Hola");
        assert!(result.succeeded);
        assert!(result.error_kind.is_none());
        assert!(result.tokens.is_empty());
        assert!(result.contributes());
    }

    #[test]
    fn test_recognition_result_failure() {
        let result = RecognitionResult::failure("cloud-vision", EngineErrorKind::Timeout);
        assert!(!result.succeeded);
        assert_eq!(result.error_kind, Some(EngineErrorKind::Timeout));
        assert!(result.text.is_empty());
        assert!(!result.contributes());
    }

    #[test]
    fn test_empty_success_does_not_contribute() {
        let result = RecognitionResult::success("ocr-space", "   \n ");
        assert!(result.succeeded);
        assert!(!result.contributes());
    }

    #[test]
    fn test_table_grid_non_rectangular() {
        let mut grid = TableGrid::new();
        grid.push_row(vec!["a".to_string(), "b".to_string()]);
        grid.push_row(vec!["c".to_string()]);
        grid.push_row(vec![]);

        assert_eq!(grid.len(), 3);
        assert!(!grid.is_empty());
        assert!(!grid.has_no_cells());
        assert_eq!(grid.rows[0].len(), 2);
        assert_eq!(grid.rows[1].len(), 1);
        assert!(grid.rows[2].is_empty());
    }

    #[test]
    fn test_engine_outcome_from_result() {
        let result = RecognitionResult::success("tesseract", "Hola");
        let outcome = EngineOutcome::from(&result);
        assert_eq!(outcome.engine_id, "tesseract");
        assert!(outcome.succeeded);
        assert_eq!(outcome.characters, 4);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(EngineErrorKind::Timeout.to_string(), "timeout");
        assert_eq!(EngineErrorKind::MissingCredential.to_string(), "missing credential");
    }
}
