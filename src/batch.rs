//! Directory batch conversion.
//!
//! ## Why one browser for the whole batch?
//!
//! Launching Chrome costs far more than rendering a typical document. The
//! orchestrator opens a single session after discovery, reuses it for every
//! file and closes it once at the end. Each file still gets its own page,
//! released as soon as that file is done.
//!
//! ## Failure isolation
//!
//! Only setup errors (missing or non-directory root, browser that cannot
//! start) escape [`run_batch`]. Every per-file error is logged with the
//! offending path, recorded as [`ConversionOutcome::Failed`] and the loop
//! moves on; failed files are not retried.
//!
//! ## Output collisions
//!
//! Under [`OutputNaming::StripExtension`](crate::pipeline::naming::OutputNaming)
//! `a.html` and `a.htm` in one directory both name `a.pdf`. The first file in
//! discovery order claims the path; every later file that derives the same
//! output is recorded as `Failed` without being rendered, so it is never
//! mistaken for a skip.

use crate::config::ConversionConfig;
use crate::convert::convert_file;
use crate::error::TopdfError;
use crate::output::{BatchSummary, ConversionOutcome, FileResult};
use crate::pipeline::chrome::ChromeEngine;
use crate::pipeline::discover::{self, InputFile};
use crate::pipeline::naming::derive_output;
use crate::pipeline::session::{RenderEngine, RenderSession};
use crate::progress::BatchProgressCallback;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert every HTML file under `root` with a shared headless Chrome.
///
/// Outputs land next to their sources, named by `config.naming`. Files are
/// processed one at a time in discovery order; `summary.files` keeps that
/// order.
///
/// # Errors
/// - [`TopdfError::DirectoryNotFound`] / [`TopdfError::NotADirectory`]: bad root
/// - [`TopdfError::EngineUnavailable`]: there was work to do but the browser
///   could not be started
pub async fn run_batch(
    root: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchSummary, TopdfError> {
    let engine = ChromeEngine::from_config(config);
    run_batch_with_engine(root, config, &engine).await
}

/// Like [`run_batch`], but with a caller-supplied rendering engine.
pub async fn run_batch_with_engine(
    root: impl AsRef<Path>,
    config: &ConversionConfig,
    engine: &dyn RenderEngine,
) -> Result<BatchSummary, TopdfError> {
    let start = Instant::now();
    let root = root.as_ref().to_path_buf();
    info!(
        "Scanning {} for HTML files (naming: {:?})",
        root.display(),
        config.naming
    );

    // ── Step 1: Discover ─────────────────────────────────────────────────
    let walk_root = root.clone();
    let files = tokio::task::spawn_blocking(move || discover::discover(&walk_root))
        .await
        .map_err(|e| TopdfError::Internal(format!("Discovery task panicked: {}", e)))??;
    let total = files.len();
    info!("Found {} HTML files", total);

    let mut summary = BatchSummary {
        files_found: total,
        ..Default::default()
    };
    notify(config, |cb| cb.on_batch_start(total));

    // ── Step 2: Nothing to do → never start the browser ──────────────────
    if files.is_empty() {
        info!("No HTML files found under {}", root.display());
        summary.duration_ms = start.elapsed().as_millis() as u64;
        notify(config, |cb| cb.on_batch_complete(&summary));
        return Ok(summary);
    }

    // ── Step 3: One session for the whole batch ──────────────────────────
    let mut session = engine
        .open()
        .await
        .map_err(|e| TopdfError::EngineUnavailable {
            detail: e.to_string(),
        })?;

    // Output path → the input that claimed it in this run.
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(total);
    for (i, file) in files.iter().enumerate() {
        let output = derive_output(&file.path, config.naming);
        let result = match claimed.get(&output) {
            Some(owner) => collision(i + 1, total, file, output, owner, config),
            None => {
                claimed.insert(output.clone(), file.path.clone());
                convert_one(i + 1, total, file, output, session.as_mut(), config).await
            }
        };
        summary.record(result);
    }

    // ── Step 4: Release the session exactly once ─────────────────────────
    debug!("Closing browser...");
    if let Err(e) = session.close().await {
        warn!("Failed to close rendering session: {}", e);
    }

    summary.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Batch complete: {} found, {} converted, {} skipped, {} failed ({}ms)",
        summary.files_found,
        summary.converted,
        summary.skipped,
        summary.failed,
        summary.duration_ms
    );
    notify(config, |cb| cb.on_batch_complete(&summary));

    Ok(summary)
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(
    root: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchSummary, TopdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TopdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run_batch(root, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Convert one discovered file, turning any error into a `Failed` record.
async fn convert_one(
    index: usize,
    total: usize,
    file: &InputFile,
    output: PathBuf,
    session: &mut dyn RenderSession,
    config: &ConversionConfig,
) -> FileResult {
    let input = file.path.as_path();
    notify(config, |cb| cb.on_file_start(index, total, input));

    let file_start = Instant::now();
    let outcome = match convert_file(input, &output, session, config).await {
        Ok(outcome) => outcome,
        Err(e) => ConversionOutcome::Failed {
            reason: e.to_string(),
        },
    };

    match &outcome {
        ConversionOutcome::Converted => {
            info!("[{index}/{total}] Converted {} -> {}", input.display(), output.display());
            notify(config, |cb| cb.on_file_converted(index, total, input, &output));
        }
        ConversionOutcome::Skipped => {
            info!("[{index}/{total}] Skipped {} (output exists)", input.display());
            notify(config, |cb| cb.on_file_skipped(index, total, input, &output));
        }
        ConversionOutcome::Failed { reason } => {
            warn!("[{index}/{total}] Failed to convert {}: {}", input.display(), reason);
            notify(config, |cb| cb.on_file_failed(index, total, input, reason));
        }
    }

    FileResult {
        input: input.to_path_buf(),
        output,
        outcome,
        duration_ms: file_start.elapsed().as_millis() as u64,
    }
}

/// Record a file whose output was already claimed earlier in the batch.
fn collision(
    index: usize,
    total: usize,
    file: &InputFile,
    output: PathBuf,
    owner: &Path,
    config: &ConversionConfig,
) -> FileResult {
    let input = file.path.as_path();
    let reason = format!("output '{}' collides with '{}'", output.display(), owner.display());
    notify(config, |cb| cb.on_file_start(index, total, input));
    warn!("[{index}/{total}] Failed to convert {}: {}", input.display(), reason);
    notify(config, |cb| cb.on_file_failed(index, total, input, &reason));

    FileResult {
        input: input.to_path_buf(),
        output,
        outcome: ConversionOutcome::Failed { reason },
        duration_ms: 0,
    }
}

fn notify(config: &ConversionConfig, event: impl FnOnce(&dyn BatchProgressCallback)) {
    if let Some(cb) = config.progress_callback.as_deref() {
        event(cb);
    }
}
