//! Single-document conversion.
//!
//! [`convert_file`] is the unit of work shared by both modes: it converts one
//! input into one PDF using a session somebody else owns. [`convert`] wraps
//! it with a browser launched for that one file; the batch orchestrator in
//! [`crate::batch`] wraps it with one browser for the whole directory.

use crate::config::ConversionConfig;
use crate::error::{RenderError, TopdfError};
use crate::output::ConversionOutcome;
use crate::pipeline::chrome::ChromeEngine;
use crate::pipeline::markup::{self, InputFormat};
use crate::pipeline::session::{RenderEngine, RenderPage, RenderSession};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Convert an HTML or text file to PDF with a dedicated browser.
///
/// The input is validated before the browser starts, so a skip or a bad
/// input never pays the launch cost.
///
/// # Returns
/// `Ok(ConversionOutcome::Converted)` when a PDF was written, or
/// `Ok(ConversionOutcome::Skipped)` when `output` already existed.
///
/// # Errors
/// Every failure is terminal here: missing input, unsupported extension,
/// browser unavailable, or a rendering failure.
pub async fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, TopdfError> {
    let engine = ChromeEngine::from_config(config);
    convert_with_engine(input, output, config, &engine).await
}

/// Like [`convert`], but with a caller-supplied rendering engine.
pub async fn convert_with_engine(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
    engine: &dyn RenderEngine,
) -> Result<ConversionOutcome, TopdfError> {
    let start = Instant::now();
    let (input, output) = (input.as_ref(), output.as_ref());
    info!(
        "Starting PDF conversion: {} -> {}",
        input.display(),
        output.display()
    );

    if preflight(input, output).await?.is_none() {
        info!("Output already exists, skipping: {}", output.display());
        return Ok(ConversionOutcome::Skipped);
    }

    let mut session = engine
        .open()
        .await
        .map_err(|e| TopdfError::EngineUnavailable {
            detail: e.to_string(),
        })?;

    let result = convert_file(input, output, session.as_mut(), config).await;

    debug!("Closing browser...");
    if let Err(e) = session.close().await {
        warn!("Failed to close rendering session: {}", e);
    }

    match &result {
        Ok(_) => info!(
            "PDF generated successfully: {} ({}ms)",
            output.display(),
            start.elapsed().as_millis()
        ),
        Err(e) => error!("Failed to convert file: {}", e),
    }
    result
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, TopdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TopdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input, output, config))
}

/// Convert one file using an already-open session.
///
/// Steps, in order:
/// 1. missing input → [`TopdfError::InputNotFound`]
/// 2. existing output → [`ConversionOutcome::Skipped`], nothing else happens
/// 3. unknown extension → [`TopdfError::UnsupportedFormat`]
/// 4. create the output directory
/// 5. acquire a page, load the markup, wait for it to settle, print
/// 6. release the page whatever happened in 5
/// 7. write the PDF (temp file + rename)
///
/// Failures in steps 4–7 are reported as [`TopdfError::RenderingFailure`].
/// The session stays open; closing it is the caller's job.
pub async fn convert_file(
    input: &Path,
    output: &Path,
    session: &mut dyn RenderSession,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, TopdfError> {
    let Some(format) = preflight(input, output).await? else {
        debug!("Output exists, skipping: {}", output.display());
        return Ok(ConversionOutcome::Skipped);
    };

    ensure_output_dir(input, output).await?;

    let raw = tokio::fs::read(input)
        .await
        .map_err(|e| TopdfError::rendering(input, format!("failed to read input: {e}")))?;
    let content = String::from_utf8_lossy(&raw);
    debug!(
        "Processing {} file: {}",
        match format {
            InputFormat::Markup => "HTML",
            InputFormat::Text => "TXT",
        },
        input.display()
    );
    let html = markup::prepare(format, &content);

    let mut page = session
        .new_page()
        .await
        .map_err(|e| TopdfError::rendering(input, e))?;
    let rendered = render_on_page(page.as_mut(), &html, config).await;
    if let Err(e) = page.close().await {
        warn!("Failed to release page for {}: {}", input.display(), e);
    }
    let pdf = rendered.map_err(|e| TopdfError::rendering(input, e))?;

    write_atomically(output, &pdf).await.map_err(|e| {
        TopdfError::rendering(input, format!("failed to write '{}': {e}", output.display()))
    })?;

    debug!("Wrote {} bytes to {}", pdf.len(), output.display());
    Ok(ConversionOutcome::Converted)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Steps 1–3 of [`convert_file`]. `Ok(None)` means "skip".
async fn preflight(input: &Path, output: &Path) -> Result<Option<InputFormat>, TopdfError> {
    if !path_exists(input).await {
        return Err(TopdfError::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    if path_exists(output).await {
        return Ok(None);
    }

    let format = InputFormat::from_path(input).ok_or_else(|| TopdfError::UnsupportedFormat {
        path: input.to_path_buf(),
        extension: input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_else(|| "(none)".to_string()),
    })?;

    Ok(Some(format))
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn ensure_output_dir(input: &Path, output: &Path) -> Result<(), TopdfError> {
    let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if path_exists(parent).await {
        return Ok(());
    }

    info!("Creating output directory: {}", parent.display());
    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        TopdfError::rendering(
            input,
            format!("failed to create output directory '{}': {e}", parent.display()),
        )
    })
}

async fn render_on_page(
    page: &mut dyn RenderPage,
    html: &str,
    config: &ConversionConfig,
) -> Result<Vec<u8>, RenderError> {
    page.load_markup(html).await?;
    page.wait_until_settled(config.settle_timeout_secs.map(Duration::from_secs))
        .await?;
    debug!("Generating PDF...");
    let pdf = page.print_pdf(&config.page_layout()).await?;
    if pdf.is_empty() {
        return Err(RenderError::Page("engine returned an empty PDF".into()));
    }
    Ok(pdf)
}

/// Write to `<output>.tmp`, then rename, so an interrupted run never leaves a
/// truncated PDF that the next run would skip.
async fn write_atomically(output: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = temp_path_for(output);
    let written = match tokio::fs::write(&tmp_path, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp_path, output).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    written
}

fn temp_path_for(output: &Path) -> PathBuf {
    let mut raw: OsString = output.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}
