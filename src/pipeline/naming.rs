//! Output-path derivation.
//!
//! Pure path arithmetic: nothing here touches the file system, so the same
//! input and policy always yield the same output path.

use crate::pipeline::markup::InputFormat;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How a PDF path is derived from its source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputNaming {
    /// `report.html` → `report.html.pdf`. (default)
    #[default]
    Append,
    /// `report.html` → `report.pdf`; paths without a known input extension
    /// fall back to `Append`.
    StripExtension,
}

/// Derive the PDF path for `input` under `naming`.
pub fn derive_output(input: &Path, naming: OutputNaming) -> PathBuf {
    match naming {
        OutputNaming::StripExtension if InputFormat::from_path(input).is_some() => {
            input.with_extension("pdf")
        }
        _ => append_pdf(input),
    }
}

fn append_pdf(input: &Path) -> PathBuf {
    let mut raw: OsString = input.as_os_str().to_owned();
    raw.push(".pdf");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_full_name() {
        assert_eq!(
            derive_output(Path::new("docs/report.html"), OutputNaming::Append),
            PathBuf::from("docs/report.html.pdf")
        );
    }

    #[test]
    fn strip_replaces_known_extension() {
        assert_eq!(
            derive_output(Path::new("docs/report.html"), OutputNaming::StripExtension),
            PathBuf::from("docs/report.pdf")
        );
        assert_eq!(
            derive_output(Path::new("docs/INDEX.HTM"), OutputNaming::StripExtension),
            PathBuf::from("docs/INDEX.pdf")
        );
        assert_eq!(
            derive_output(Path::new("notes.txt"), OutputNaming::StripExtension),
            PathBuf::from("notes.pdf")
        );
    }

    #[test]
    fn strip_falls_back_to_append_for_unknown_extension() {
        assert_eq!(
            derive_output(Path::new("archive.tar"), OutputNaming::StripExtension),
            PathBuf::from("archive.tar.pdf")
        );
        assert_eq!(
            derive_output(Path::new("README"), OutputNaming::StripExtension),
            PathBuf::from("README.pdf")
        );
    }

    #[test]
    fn only_last_extension_is_stripped() {
        assert_eq!(
            derive_output(Path::new("page.v2.html"), OutputNaming::StripExtension),
            PathBuf::from("page.v2.pdf")
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        for naming in [OutputNaming::Append, OutputNaming::StripExtension] {
            let p = Path::new("a/b/c.html");
            assert_eq!(derive_output(p, naming), derive_output(p, naming));
        }
    }
}
