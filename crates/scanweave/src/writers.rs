//! Output artifact writers.
//!
//! One writer per [`OutputKind`]. Writers receive the final path from the
//! pipeline and never pick extensions themselves.

use crate::error::Result;
use crate::table;
use crate::types::{OutputKind, PipelineOutput, TableGrid};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Write fused text exactly as produced.
pub async fn write_plain_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).await?;
    debug!("wrote plain text artifact to {}", path.display());
    Ok(())
}

/// Write a document artifact.
///
/// Paragraphs are blank-line separated spans of the text; each is trimmed
/// and empty ones are dropped before rejoining.
pub async fn write_document(path: &Path, text: &str) -> Result<()> {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect();
    fs::write(path, paragraphs.join("\n\n")).await?;
    debug!("wrote document artifact to {}", path.display());
    Ok(())
}

/// Write a spreadsheet artifact as CSV.
///
/// Rows keep their own widths; rows with no cells are skipped. An empty
/// grid still produces the file.
pub async fn write_spreadsheet(path: &Path, grid: &TableGrid) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for row in &grid.rows {
        if row.is_empty() {
            continue;
        }
        writer
            .write_record(row)
            .map_err(|e| std::io::Error::other(format!("could not encode CSV row: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(format!("could not finish CSV: {}", e)))?;

    fs::write(path, bytes).await?;
    debug!("wrote spreadsheet artifact to {}", path.display());
    Ok(())
}

/// Dispatch one pipeline output to the writer for its kind.
pub async fn write_output(path: &Path, kind: OutputKind, output: &PipelineOutput) -> Result<()> {
    match kind {
        OutputKind::PlainText => write_plain_text(path, &output.text).await,
        OutputKind::Document => write_document(path, &output.text).await,
        OutputKind::Spreadsheet => match &output.table {
            Some(grid) => write_spreadsheet(path, grid).await,
            None => write_spreadsheet(path, &table::reconstruct_table(&output.text)).await,
        },
    }
}
