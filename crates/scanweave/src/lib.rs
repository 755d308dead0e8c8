//! Scanweave - Scanned Document Conversion Library
//!
//! Scanweave turns scanned page images into machine-readable artifacts. It
//! enhances the scan, runs every configured recognition engine in parallel,
//! fuses their transcriptions, repairs recognition noise against a language
//! dictionary, and writes the result as plain text, a document, or a
//! spreadsheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scanweave::{OutputKind, Pipeline, ScanweaveConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> scanweave::Result<()> {
//! let config = ScanweaveConfig::default();
//! let pipeline = Pipeline::new(config).await?;
//! let outcome = pipeline
//!     .convert_file("scan.png".as_ref(), None, OutputKind::PlainText)
//!     .await?;
//! println!("wrote {}", outcome.artifact_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Enhancement** (`enhance`): grayscale, denoise, contrast equalization,
//!   adaptive binarization
//! - **Engines** (`engines`): local Tesseract subprocess, Google Cloud Vision,
//!   OCR.space; all behind one [`RecognitionEngine`] trait
//! - **Orchestration** (`orchestrator`): parallel fan-out with per-engine
//!   failure isolation and order-stable fusion
//! - **Correction** (`correct`): dictionary-driven two-pass cleanup for
//!   Spanish and English
//! - **Tables** (`table`, `table_layout`): separator-based and
//!   geometry-based row reconstruction
//! - **Writers** (`writers`): txt, md, and csv artifacts

#![deny(unsafe_code)]

pub mod config;
pub mod correct;
pub mod engines;
pub mod enhance;
pub mod error;
pub mod language;
pub mod orchestrator;
pub mod pipeline;
pub mod table;
pub mod table_layout;
pub mod types;
pub mod writers;

pub use error::{Result, ScanweaveError};
pub use types::*;

pub use config::{
    CloudVisionConfig, CorrectionConfig, LocalEngineConfig, ScanweaveConfig, WebServiceConfig,
};

pub use engines::{
    CloudVisionEngine, LocalEngine, RecognitionEngine, RecognitionInput, WebServiceEngine,
};

pub use language::{DEFAULT_LANGUAGE, available_languages, normalize_language};

pub use orchestrator::{fuse, run_engines};

pub use pipeline::{ConversionOutcome, Pipeline};
