//! Single-file conversion command.

use anyhow::{Context as _, Result};
use clap::Args;
use scanweave::{OutputKind, Pipeline, ScanweaveConfig};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Args)]
pub struct ConvertCommand {
    /// Input scanned page image
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Output format: txt, md, or csv
    #[arg(short, long, default_value = "txt")]
    format: String,

    /// Directory for the artifact (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file (defaults to discovering scanweave.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognition language override, e.g. "spa" or "spa+eng"
    #[arg(short, long)]
    language: Option<String>,

    /// Print a JSON conversion report instead of the artifact path
    #[arg(long)]
    json: bool,
}

impl ConvertCommand {
    pub async fn execute(self) -> Result<()> {
        // The format is rejected before any image work happens.
        let kind = OutputKind::from_str(&self.format)
            .with_context(|| format!("unsupported output format '{}'", self.format))?;

        let mut config = ScanweaveConfig::load(self.config.as_deref())?;
        if let Some(language) = self.language {
            config.default_language = language;
        }

        let pipeline = Pipeline::new(config).await?;
        let outcome = pipeline
            .convert_file(&self.input, self.output_dir.as_deref(), kind)
            .await
            .with_context(|| format!("failed to convert {}", self.input.display()))?;

        for engine in &outcome.output.engine_results {
            let status = if engine.succeeded { "ok" } else { "failed" };
            info!(
                "engine {}: {} ({} characters)",
                engine.engine_id, status, engine.characters
            );
        }

        if self.json {
            let report = serde_json::json!({
                "artifact": outcome.artifact_path,
                "characters": outcome.output.text.chars().count(),
                "engines": outcome.output.engine_results,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", outcome.artifact_path.display());
        }

        Ok(())
    }
}
