//! Error types for the topdf library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`TopdfError`] — returned by the public entry points. In single-file mode
//!   every variant is terminal. In batch mode only setup errors (bad root
//!   directory, browser that cannot start) escape [`crate::batch::run_batch`];
//!   per-file errors are folded into
//!   [`crate::output::ConversionOutcome::Failed`] so one bad document never
//!   aborts the run.
//!
//! * [`RenderError`] — raised by a [`crate::pipeline::session`] backend. The
//!   converter wraps it into [`TopdfError::RenderingFailure`] together with
//!   the offending path.
//!
//! An output file that already exists is not an error: it is the
//! [`crate::output::ConversionOutcome::Skipped`] outcome.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the topdf library.
#[derive(Debug, Error)]
pub enum TopdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file does not exist: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Input extension is neither plain text nor HTML.
    #[error(
        "Unsupported file format '{extension}' for '{path}'.\n\
Only .html, .htm and .txt files are supported."
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    // ── Discovery errors ──────────────────────────────────────────────────
    /// Batch root does not exist.
    #[error("Directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// Batch root exists but is a file (or something else).
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// Anything between preparing the output directory and writing the PDF.
    #[error("Failed to render '{path}': {detail}")]
    RenderingFailure { path: PathBuf, detail: String },

    /// The browser could not be located or launched.
    #[error(
        "Rendering engine unavailable: {detail}\n\n\
topdf needs a local Chrome or Chromium. You can:\n\
  • Install Chrome/Chromium from your package manager.\n\
  • Point --chrome (or TOPDF_CHROME) at an existing executable.\n\
  • Set RUST_LOG=chromiumoxide=debug to see why the browser refused to start.\n"
    )]
    EngineUnavailable { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TopdfError {
    /// Wrap any displayable failure into a [`TopdfError::RenderingFailure`].
    pub fn rendering(path: impl Into<PathBuf>, detail: impl std::fmt::Display) -> Self {
        TopdfError::RenderingFailure {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

/// An error raised by a rendering backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The engine process could not be started or connected to.
    #[error("failed to launch rendering engine: {0}")]
    Launch(String),

    /// A page operation (load, settle, print, close) failed.
    #[error("{0}")]
    Page(String),

    /// Content did not settle within the configured bound.
    #[error("content did not settle within {secs}s")]
    SettleTimeout { secs: u64 },

    /// The session was already closed when a page was requested.
    #[error("rendering session is closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = TopdfError::UnsupportedFormat {
            path: PathBuf::from("report.docx"),
            extension: ".docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".docx"), "got: {msg}");
        assert!(msg.contains(".html"));
    }

    #[test]
    fn rendering_helper_keeps_path_and_detail() {
        let e = TopdfError::rendering("docs/a.html", RenderError::SettleTimeout { secs: 30 });
        match &e {
            TopdfError::RenderingFailure { path, detail } => {
                assert_eq!(path, &PathBuf::from("docs/a.html"));
                assert!(detail.contains("30s"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(e.to_string().contains("docs/a.html"));
    }

    #[test]
    fn engine_unavailable_mentions_hint() {
        let e = TopdfError::EngineUnavailable {
            detail: "no chrome".into(),
        };
        assert!(e.to_string().contains("--chrome"));
    }

    #[test]
    fn session_closed_display() {
        assert_eq!(RenderError::SessionClosed.to_string(), "rendering session is closed");
    }
}
