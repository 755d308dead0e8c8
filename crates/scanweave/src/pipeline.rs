//! End-to-end conversion pipeline.
//!
//! One [`Pipeline`] owns the engine registry, the validated recognition
//! language and the corrector. Processing a page runs: load, enhance, encode
//! once, fan out to every engine, fuse, correct, and (for spreadsheets)
//! reconstruct a table. Writing artifacts is layered on top in
//! [`Pipeline::convert_file`] and [`Pipeline::convert_files`].

use crate::config::ScanweaveConfig;
use crate::correct::Corrector;
use crate::engines::{
    CloudVisionEngine, LocalEngine, RecognitionEngine, RecognitionInput, WebServiceEngine, local,
};
use crate::enhance;
use crate::error::Result;
use crate::language;
use crate::orchestrator;
use crate::table;
use crate::types::{EngineOutcome, OutputKind, PipelineOutput};
use crate::writers;
use image::{DynamicImage, ImageEncoder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// One written artifact and the pipeline output behind it.
pub struct ConversionOutcome {
    pub artifact_path: PathBuf,
    pub output: PipelineOutput,
}

/// Shared conversion pipeline. Cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    config: ScanweaveConfig,
    engines: Vec<Arc<dyn RecognitionEngine>>,
    corrector: Option<Corrector>,
    language: String,
}

impl Pipeline {
    /// Build a pipeline with the engines the configuration enables, in
    /// fixed registration order: local, cloud vision, web service.
    ///
    /// A local binary that cannot be executed fails construction with a
    /// `MissingDependency` error when the local engine is the only one
    /// enabled. With other engines enabled the probe failure is logged and
    /// each page degrades to the remaining engines.
    pub async fn new(config: ScanweaveConfig) -> Result<Self> {
        let engines = build_engines(&config)?;

        if config.local.enabled {
            if let Err(e) = local::validate_binary(&config.local).await {
                if engines.len() == 1 {
                    return Err(e);
                }
                warn!("{}; continuing with the remaining engines", e);
            }
        }

        Self::with_engines(config, engines).await
    }

    /// Build a pipeline around caller-supplied engines.
    ///
    /// Fusion order follows the order of `engines`.
    pub async fn with_engines(
        config: ScanweaveConfig,
        engines: Vec<Arc<dyn RecognitionEngine>>,
    ) -> Result<Self> {
        config.validate()?;

        if engines.is_empty() {
            warn!("no recognition engines enabled; conversions will produce empty text");
        }

        let available = if config.local.enabled {
            language::available_languages(&config.local).await
        } else {
            language::FALLBACK_LANGUAGES.iter().map(|s| s.to_string()).collect()
        };
        let language = language::normalize_language(&config.default_language, &available);
        debug!("recognition language resolved to '{}'", language);

        let corrector = config
            .correction
            .enabled
            .then(|| Corrector::for_language(&language, &config.correction));

        Ok(Self {
            inner: Arc::new(PipelineInner {
                config,
                engines,
                corrector,
                language,
            }),
        })
    }

    /// Identifiers of the registered engines, in fusion order.
    pub fn engine_ids(&self) -> Vec<&str> {
        self.inner.engines.iter().map(|engine| engine.engine_id()).collect()
    }

    /// The validated recognition language.
    pub fn language(&self) -> &str {
        &self.inner.language
    }

    /// Run the full pipeline over one page image.
    ///
    /// Engine failures never surface here; they are reported through
    /// `engine_results` on the output. Errors mean the page itself could
    /// not be read or decoded.
    pub async fn process(&self, image_path: &Path, kind: OutputKind) -> Result<PipelineOutput> {
        let bytes = fs::read(image_path).await?;
        let image = image::load_from_memory(&bytes)?;

        // The local engine reads the enhanced bitmap; the network engines
        // receive the original scan re-encoded, since those services run
        // their own preprocessing.
        let jpeg = encode_jpeg(&image)?;
        let enhanced = enhance::enhance(&image);

        let input = RecognitionInput {
            image: Arc::new(enhanced),
            jpeg: Arc::new(jpeg),
            language: self.inner.language.clone(),
        };

        let results = orchestrator::run_engines(&self.inner.engines, input).await;
        let fused = orchestrator::fuse(&results);
        let text = match &self.inner.corrector {
            Some(corrector) => corrector.correct(&fused),
            None => fused,
        };

        let table = (kind == OutputKind::Spreadsheet).then(|| table::reconstruct_table(&text));

        Ok(PipelineOutput {
            text,
            table,
            engine_results: results.iter().map(EngineOutcome::from).collect(),
        })
    }

    /// Convert one page image and write the artifact next to it, or into
    /// `output_dir` when given. The artifact keeps the input's stem and
    /// takes the extension of the output kind.
    pub async fn convert_file(
        &self,
        input_path: &Path,
        output_dir: Option<&Path>,
        kind: OutputKind,
    ) -> Result<ConversionOutcome> {
        let output = self.process(input_path, kind).await?;

        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        fs::create_dir_all(&dir).await?;

        let artifact_path = dir.join(format!("{}.{}", stem, kind.extension()));
        writers::write_output(&artifact_path, kind, &output).await?;

        Ok(ConversionOutcome { artifact_path, output })
    }

    /// Convert many page images concurrently.
    ///
    /// Results come back in input order with per-file errors in place, so
    /// one unreadable page never aborts the batch. Concurrency is capped by
    /// `max_concurrent_conversions`, defaulting to twice the core count.
    pub async fn convert_files(
        &self,
        input_paths: Vec<PathBuf>,
        output_dir: Option<&Path>,
        kind: OutputKind,
    ) -> Vec<Result<ConversionOutcome>> {
        if input_paths.is_empty() {
            return Vec::new();
        }

        let max_concurrent = self
            .inner
            .config
            .max_concurrent_conversions
            .unwrap_or_else(|| num_cpus::get() * 2);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let output_dir = output_dir.map(Path::to_path_buf);

        let mut tasks = JoinSet::new();
        for (index, path) in input_paths.into_iter().enumerate() {
            let pipeline = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let output_dir = output_dir.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                let result = pipeline.convert_file(&path, output_dir.as_deref(), kind).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<ConversionOutcome>>> = Vec::new();
        slots.resize_with(tasks.len(), || None);

        while let Some(task_result) = tasks.join_next().await {
            match task_result {
                Ok((index, result)) => slots[index] = Some(result),
                Err(join_err) => warn!("conversion task did not complete: {}", join_err),
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(std::io::Error::other("conversion task did not complete").into())
                })
            })
            .collect()
    }
}

fn build_engines(config: &ScanweaveConfig) -> Result<Vec<Arc<dyn RecognitionEngine>>> {
    let mut engines: Vec<Arc<dyn RecognitionEngine>> = Vec::new();
    if config.local.enabled {
        engines.push(Arc::new(LocalEngine::new(config.local.clone())));
    }
    if config.cloud_vision.enabled {
        engines.push(Arc::new(CloudVisionEngine::new(config.cloud_vision.clone())?));
    }
    if config.web_service.enabled {
        engines.push(Arc::new(WebServiceEngine::new(config.web_service.clone())?));
    }
    Ok(engines)
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}
