//! Concurrent engine fan-out and segment fusion.
//!
//! All registered engines run over the same input at once. Results come back
//! in registration order regardless of completion order, so fused output is
//! deterministic for a given engine registry. A panicking engine task is
//! folded into a failed result for that engine alone.

use crate::engines::{RecognitionEngine, RecognitionInput};
use crate::types::{EngineErrorKind, RecognitionResult, SEGMENT_SEPARATOR};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Run every engine concurrently over one input.
///
/// The returned vector has one entry per engine, in registration order.
pub async fn run_engines(
    engines: &[Arc<dyn RecognitionEngine>],
    input: RecognitionInput,
) -> Vec<RecognitionResult> {
    if engines.is_empty() {
        return Vec::new();
    }

    let mut tasks = JoinSet::new();
    for (index, engine) in engines.iter().enumerate() {
        let engine = Arc::clone(engine);
        let input = input.clone();
        tasks.spawn(async move {
            let result = engine.recognize(&input).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<RecognitionResult>> = vec![None; engines.len()];

    while let Some(task_result) = tasks.join_next().await {
        match task_result {
            Ok((index, result)) => {
                slots[index] = Some(result);
            }
            Err(join_err) => {
                // Index is lost when a task panics; the slot sweep below
                // attributes the failure to the engine that never reported.
                warn!("engine task did not complete: {}", join_err);
            }
        }
    }

    for (index, slot) in slots.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = Some(RecognitionResult::failure(
                engines[index].engine_id(),
                EngineErrorKind::Invocation,
            ));
        }
    }

    let results: Vec<RecognitionResult> = slots.into_iter().flatten().collect();
    debug!(
        "{}/{} engines contributed",
        results.iter().filter(|r| r.contributes()).count(),
        results.len()
    );
    results
}

/// Join contributing segments in registration order.
///
/// Engines that failed or produced blank text are skipped. When nothing
/// contributes the fused text is empty, never an error.
pub fn fuse(results: &[RecognitionResult]) -> String {
    let segments: Vec<&str> = results
        .iter()
        .filter(|result| result.contributes())
        .map(|result| result.text.as_str())
        .collect();
    segments.join(SEGMENT_SEPARATOR)
}
