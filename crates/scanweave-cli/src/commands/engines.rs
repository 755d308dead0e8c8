//! Enabled-engine listing command.

use anyhow::Result;
use clap::Args;
use scanweave::{Pipeline, ScanweaveConfig};
use std::path::PathBuf;

#[derive(Args)]
pub struct EnginesCommand {
    /// Configuration file (defaults to discovering scanweave.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl EnginesCommand {
    pub async fn execute(self) -> Result<()> {
        let config = ScanweaveConfig::load(self.config.as_deref())?;
        let pipeline = Pipeline::new(config).await?;

        println!("language: {}", pipeline.language());
        for id in pipeline.engine_ids() {
            println!("{}", id);
        }
        Ok(())
    }
}
