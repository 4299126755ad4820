//! Directory discovery: find every HTML file below a root directory.
//!
//! Entries come back in the order the file system lists them, depth-first.
//! That order is stable on one machine but differs between file systems, so
//! callers that compare runs across machines should sort.
//!
//! Symbolic links are never followed (neither to files nor to directories),
//! which also means a link cycle cannot trap the walk.

use crate::error::TopdfError;
use crate::pipeline::markup::InputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A document to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    pub format: InputFormat,
}

impl InputFile {
    /// Classify `path` by extension; `None` for unsupported formats.
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = InputFormat::from_path(&path)?;
        Some(Self { path, format })
    }
}

/// Walk `root` recursively and return its HTML files.
///
/// Plain-text files are never picked up here; they are only converted when
/// named explicitly. Unreadable entries below `root` are logged and skipped.
pub fn discover(root: &Path) -> Result<Vec<InputFile>, TopdfError> {
    if !root.exists() {
        return Err(TopdfError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(TopdfError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(file) = InputFile::new(entry.into_path()) {
            if file.format == InputFormat::Markup {
                found.push(file);
            }
        }
    }

    debug!("Discovered {} HTML files under {}", found.len(), root.display());
    Ok(found)
}
