//! Installed-language listing command.

use anyhow::Result;
use clap::Args;
use scanweave::{ScanweaveConfig, available_languages};
use std::path::PathBuf;

#[derive(Args)]
pub struct LanguagesCommand {
    /// Configuration file (defaults to discovering scanweave.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LanguagesCommand {
    pub async fn execute(self) -> Result<()> {
        let config = ScanweaveConfig::load(self.config.as_deref())?;
        for language in available_languages(&config.local).await {
            println!("{}", language);
        }
        Ok(())
    }
}
