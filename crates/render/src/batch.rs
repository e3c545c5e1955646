//! Parallel rendering of many documents.

use crate::compiler::Compiler;
use crate::context::{PageContext, RenderContext};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// One document to render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown source.
    pub source: String,
    /// Page data for the render context.
    #[serde(default)]
    pub page: Option<PageContext>,
}

/// Outcome for one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// Rendered output (present on success).
    pub output: Option<String>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Number of documents attempted.
    pub total: u32,
    /// Number rendered successfully.
    pub succeeded: u32,
    /// Number that failed.
    pub failed: u32,
    /// Wall-clock time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the global rayon pool.
    pub max_threads: Option<usize>,
    /// Whether to keep going after a failure. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Layout markup each document renders into as the slot content.
    pub layout_source: Option<String>,
}

/// All results of a batch run in input order, with statistics.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    /// One result per attempted document.
    pub results: Vec<BatchResult>,
    /// Run statistics.
    pub stats: BatchStats,
}

/// Renders `inputs` in parallel with a shared compiler.
///
/// A failed document never affects the others. When `continue_on_error` is
/// false the documents render sequentially and the run stops after the
/// first failure.
pub fn render_batch(compiler: &Compiler, inputs: Vec<BatchInput>, options: &BatchOptions) -> BatchOutput {
    let start = Instant::now();
    let continue_on_error = options.continue_on_error.unwrap_or(true);

    let pool = options.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| log::warn!("falling back to the global thread pool: {e}"))
            .ok()
    });

    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        match render_one(compiler, &input, options.layout_source.as_deref()) {
            Ok(output) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    output: Some(output),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("failed to render {}: {e}", input.id);
                BatchResult {
                    id: input.id,
                    output: None,
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let stop = result.error.is_some();
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    BatchOutput {
        stats: BatchStats {
            total: results.len() as u32,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
        results,
    }
}

fn render_one(
    compiler: &Compiler,
    input: &BatchInput,
    layout_source: Option<&str>,
) -> Result<String, crate::error::RenderError> {
    let page = input.page.clone().unwrap_or_else(|| PageContext::new(&input.id));
    let mut out = Vec::new();
    match layout_source {
        Some(layout) => compiler.render_page(layout, &input.source, page, &mut out)?,
        None => {
            let ctx = RenderContext::new().with_page(page);
            compiler.convert_with(&input.source, &ctx, &mut out)?
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}
