//! End-to-end tests against a real headless Chrome.
//!
//! These launch a browser, so they are gated behind the `E2E_ENABLED`
//! environment variable and skip quietly when no Chrome/Chromium can be
//! found.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! Point at a specific browser with:
//!   E2E_ENABLED=1 CHROME_PATH=/usr/bin/chromium cargo test --test e2e

use std::fs;
use std::path::Path;
use topdf::{
    convert, run_batch, ConversionConfig, ConversionOutcome, MarginPreset, OutputNaming,
    TopdfError,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set and a browser is installed.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if !chrome_locate::is_browser_available() {
            println!("SKIP — no Chrome/Chromium found (set CHROME_PATH)");
            return;
        }
        init_tracing();
    }};
}

/// Route library logs to the test output; `RUST_LOG` overrides the level.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topdf=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn assert_pdf(path: &Path) {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    assert!(
        bytes.starts_with(b"%PDF-"),
        "{} does not look like a PDF",
        path.display()
    );
    assert!(bytes.len() > 500, "{} is suspiciously small", path.display());
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

// ── Single file ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_convert_html() {
    e2e_skip_unless_ready!();
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("page.html");
    let output = tmp.path().join("page.pdf");
    write(
        &input,
        "<html><head><style>h1{color:#c00}</style></head>\
         <body><h1>Quarterly report</h1><p>Hello from topdf.</p></body></html>",
    );

    let outcome = convert(&input, &output, &ConversionConfig::default())
        .await
        .expect("conversion failed");

    assert_eq!(outcome, ConversionOutcome::Converted);
    assert_pdf(&output);
}

#[tokio::test]
async fn test_convert_text_with_markup_characters() {
    e2e_skip_unless_ready!();
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("notes.txt");
    let output = tmp.path().join("notes.pdf");
    write(&input, "Line one\n<script>alert('x')</script>\nA & B\n");

    let config = ConversionConfig::builder()
        .margins(MarginPreset::Narrow)
        .scale(1.0)
        .settle_timeout_secs(30)
        .build()
        .unwrap();
    convert(&input, &output, &config)
        .await
        .expect("conversion failed");

    assert_pdf(&output);
}

#[tokio::test]
async fn test_second_convert_is_skipped() {
    e2e_skip_unless_ready!();
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("page.html");
    let output = tmp.path().join("page.pdf");
    write(&input, "<p>once</p>");
    let config = ConversionConfig::default();

    convert(&input, &output, &config).await.unwrap();
    let first = fs::read(&output).unwrap();

    let outcome = convert(&input, &output, &config).await.unwrap();
    assert_eq!(outcome, ConversionOutcome::Skipped);
    assert_eq!(fs::read(&output).unwrap(), first);
}

#[tokio::test]
async fn test_bad_browser_path_is_engine_unavailable() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("page.html");
    write(&input, "<p>x</p>");

    let config = ConversionConfig::builder()
        .browser_executable(tmp.path().join("not-a-browser"))
        .build()
        .unwrap();
    let err = convert(&input, tmp.path().join("page.pdf"), &config)
        .await
        .unwrap_err();

    assert!(
        matches!(err, TopdfError::EngineUnavailable { .. }),
        "got: {err}"
    );
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_directory() {
    e2e_skip_unless_ready!();
    let tmp = tempfile::tempdir().unwrap();
    let docs = tmp.path().join("docs");
    write(&docs.join("a.html"), "<h1>A</h1>");
    write(&docs.join("sub/b.htm"), "<h1>B</h1>");
    write(&docs.join("notes.txt"), "not picked up in batch mode");

    let config = ConversionConfig::builder()
        .naming(OutputNaming::StripExtension)
        .build()
        .unwrap();
    let summary = run_batch(&docs, &config).await.expect("batch failed");

    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 0);
    assert_pdf(&docs.join("a.pdf"));
    assert_pdf(&docs.join("sub/b.pdf"));
    assert!(!docs.join("notes.pdf").exists());

    let again = run_batch(&docs, &config).await.unwrap();
    assert_eq!(again.skipped, 2);
    assert_eq!(again.converted, 0);
}
