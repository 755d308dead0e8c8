//! Batch conversion command.

use anyhow::{Context as _, Result};
use clap::Args;
use scanweave::{OutputKind, Pipeline, ScanweaveConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Args)]
pub struct BatchCommand {
    /// Input scanned page images
    #[arg(value_name = "IMAGES", required = true)]
    inputs: Vec<PathBuf>,

    /// Output format: txt, md, or csv
    #[arg(short, long, default_value = "txt")]
    format: String,

    /// Directory for artifacts (defaults to each input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file (defaults to discovering scanweave.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognition language override, e.g. "spa" or "spa+eng"
    #[arg(short, long)]
    language: Option<String>,

    /// Maximum concurrent conversions (defaults to twice the core count)
    #[arg(long)]
    max_concurrent: Option<usize>,
}

impl BatchCommand {
    pub async fn execute(self) -> Result<()> {
        let kind = OutputKind::from_str(&self.format)
            .with_context(|| format!("unsupported output format '{}'", self.format))?;

        let valid_inputs: Vec<PathBuf> = self
            .inputs
            .iter()
            .filter(|path| {
                if path.exists() {
                    true
                } else {
                    warn!("skipping non-existent file: {}", path.display());
                    false
                }
            })
            .cloned()
            .collect();

        if valid_inputs.is_empty() {
            anyhow::bail!("no readable input files");
        }

        let mut config = ScanweaveConfig::load(self.config.as_deref())?;
        if let Some(language) = self.language {
            config.default_language = language;
        }
        if self.max_concurrent.is_some() {
            config.max_concurrent_conversions = self.max_concurrent;
        }

        let pipeline = Pipeline::new(config).await?;
        let started = Instant::now();
        let results = pipeline
            .convert_files(valid_inputs.clone(), self.output_dir.as_deref(), kind)
            .await;

        let mut failed = 0usize;
        for (path, result) in valid_inputs.iter().zip(&results) {
            match result {
                Ok(outcome) => println!("{}", outcome.artifact_path.display()),
                Err(err) => {
                    failed += 1;
                    warn!("{}: {}", path.display(), err);
                }
            }
        }

        let total = results.len();
        info!(
            "converted {} of {} files in {:.2?}",
            total - failed,
            total,
            started.elapsed()
        );

        if failed > 0 {
            anyhow::bail!("{} of {} conversions failed", failed, total);
        }
        Ok(())
    }
}
