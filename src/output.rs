//! Result types: per-file outcomes and the batch summary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of one conversion attempt.
///
/// [`crate::convert::convert_file`] only ever returns `Converted` or
/// `Skipped`; `Failed` is produced by the batch orchestrator when it isolates
/// a per-file error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// A PDF was written to the output path.
    Converted,
    /// The output path already existed; nothing was read or rendered.
    Skipped,
    /// The attempt failed; the batch continued with the next file.
    Failed { reason: String },
}

impl ConversionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ConversionOutcome::Failed { .. })
    }
}

/// The record kept for one discovered file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: ConversionOutcome,
    /// Wall-clock time spent on this file, in milliseconds.
    pub duration_ms: u64,
}

/// Aggregate counts for one batch run.
///
/// `files_found == converted + skipped + failed` once the run completes.
/// `files` is in discovery order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files_found: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub files: Vec<FileResult>,
}

impl BatchSummary {
    /// Fold one file's result into the counters.
    pub fn record(&mut self, result: FileResult) {
        match result.outcome {
            ConversionOutcome::Converted => self.converted += 1,
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::Failed { .. } => self.failed += 1,
        }
        self.files.push(result);
    }

    /// Results whose outcome is [`ConversionOutcome::Failed`].
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| f.outcome.is_failed())
    }
}
