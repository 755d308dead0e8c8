//! Scanweave CLI - scanned document conversion tool
//!
//! Command-line interface over the Scanweave pipeline: enhance a scanned
//! page, run every enabled recognition engine in parallel, fuse and correct
//! the transcriptions, and write the artifact.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

use commands::batch::BatchCommand;
use commands::convert::ConvertCommand;
use commands::engines::EnginesCommand;
use commands::languages::LanguagesCommand;

#[derive(Parser)]
#[command(
    name = "scanweave",
    version,
    about = "Convert scanned page images into text, document, and spreadsheet artifacts",
    after_help = "EXAMPLES:\n  \
                  # Convert one scan to plain text next to the input\n  \
                  scanweave convert page.png\n\n  \
                  # Convert to a reconstructed CSV table\n  \
                  scanweave convert --format csv invoice.png\n\n  \
                  # Convert a whole directory of scans in parallel\n  \
                  scanweave batch --format md --output-dir out scans/*.png\n\n  \
                  # Show the languages the local engine has installed\n  \
                  scanweave languages\n\n\
                  For more details on a specific command:\n  \
                  scanweave <COMMAND> --help"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one scanned page image
    Convert(ConvertCommand),

    /// Convert many scanned page images in parallel
    Batch(BatchCommand),

    /// List the recognition languages installed for the local engine
    Languages(LanguagesCommand),

    /// List the engines the current configuration enables
    Engines(EnginesCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Listing commands stay quiet so their output is pipeable.
    let default_level = match (&cli.command, cli.verbose) {
        (Commands::Languages(_) | Commands::Engines(_), 0) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        (_, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Convert(cmd) => cmd.execute().await,
        Commands::Batch(cmd) => cmd.execute().await,
        Commands::Languages(cmd) => cmd.execute().await,
        Commands::Engines(cmd) => cmd.execute().await,
    }
}
