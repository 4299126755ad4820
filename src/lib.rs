//! # topdf
//!
//! Convert HTML and plain-text documents to PDF with headless Chrome, one
//! file at a time or across a whole directory tree.
//!
//! ## Why a browser?
//!
//! HTML documents in the wild lean on CSS, web fonts and images. Pure-Rust
//! PDF writers reimplement a fraction of that; a real browser engine prints
//! exactly what the author saw on screen. This crate owns everything around
//! the browser: discovering inputs, naming outputs, skipping work already
//! done, keeping one browser alive for a batch, and making sure one broken
//! document never takes the rest of the batch down with it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Discover  walk the tree for .html/.htm (file-system order)
//!  ├─ 2. Name      derive each .pdf path (append or strip extension)
//!  ├─ 3. Skip      output already there → nothing to do
//!  ├─ 4. Prepare   HTML as-is; text escaped and wrapped in a template
//!  ├─ 5. Render    one Chrome for the batch, one page per file
//!  └─ 6. Report    converted / skipped / failed counts per batch
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use topdf::{convert, run_batch, ConversionConfig, OutputNaming};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One file, dedicated browser.
//!     let config = ConversionConfig::default();
//!     convert("notes.txt", "notes.pdf", &config).await?;
//!
//!     // Whole tree, shared browser: docs/a.html → docs/a.pdf
//!     let config = ConversionConfig::builder()
//!         .naming(OutputNaming::StripExtension)
//!         .build()?;
//!     let summary = run_batch("docs", &config).await?;
//!     eprintln!(
//!         "{} found, {} converted, {} skipped, {} failed",
//!         summary.files_found, summary.converted, summary.skipped, summary.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `topdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! topdf = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, run_batch_sync, run_batch_with_engine};
pub use config::{ConversionConfig, ConversionConfigBuilder, MarginPreset, PageLayout};
pub use convert::{convert, convert_file, convert_sync, convert_with_engine};
pub use error::{RenderError, TopdfError};
pub use output::{BatchSummary, ConversionOutcome, FileResult};
pub use pipeline::chrome::ChromeEngine;
pub use pipeline::discover::{discover, InputFile};
pub use pipeline::markup::InputFormat;
pub use pipeline::naming::{derive_output, OutputNaming};
pub use pipeline::session::{RenderEngine, RenderPage, RenderSession};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
