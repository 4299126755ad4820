//! # chrome-locate
//!
//! Find a Chrome or Chromium executable on the local machine, so that tools
//! driving a headless browser do not force every user to pass an explicit
//! path.
//!
//! ## How it works
//!
//! [`locate_browser`] checks, first match wins:
//!
//! 1. `CHROME_PATH` — an explicit executable path.
//! 2. Every directory of `PATH`, for the usual binary names
//!    (`google-chrome`, `chromium`, `chromium-browser`, `chrome`, …).
//! 3. Well-known install locations for the current OS.
//!
//! The result is cached for the lifetime of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrome_locate::locate_browser;
//!
//! let chrome = locate_browser().expect("no Chrome/Chromium installed");
//! println!("using {}", chrome.display());
//! ```
//!
//! ## Platform support
//!
//! | OS      | Searched install locations                                  |
//! |---------|-------------------------------------------------------------|
//! | macOS   | `/Applications/Google Chrome.app`, `/Applications/Chromium.app` |
//! | Linux   | `/usr/bin`, `/usr/local/bin`, `/snap/bin`, `/opt/google/chrome` |
//! | Windows | `Program Files` / `Program Files (x86)` / `LOCALAPPDATA`    |

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable holding an explicit browser executable path.
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Binary names probed on `PATH`, in preference order.
const PATH_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by chrome-locate.
#[derive(Error, Debug)]
pub enum LocateError {
    /// No candidate location held an executable browser.
    #[error(
        "No Chrome or Chromium executable found (searched: {}).\n\
Install Chrome/Chromium or set CHROME_PATH=/path/to/chrome.",
        .searched.join(", ")
    )]
    NotFound { searched: Vec<String> },
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns the path of a usable Chrome/Chromium executable.
///
/// Reads `CHROME_PATH` and `PATH` from the process environment. The first
/// successful lookup is cached; failures are not, so installing a browser
/// mid-process is picked up on the next call.
pub fn locate_browser() -> Result<PathBuf, LocateError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = find_browser(
        std::env::var_os(CHROME_PATH_ENV).as_deref(),
        std::env::var_os("PATH").as_deref(),
    )?;

    let _ = RESOLVED_PATH.set(path.clone());
    Ok(path)
}

/// Returns `true` if [`locate_browser`] would succeed.
pub fn is_browser_available() -> bool {
    locate_browser().is_ok()
}

/// Uncached lookup with explicit inputs.
///
/// `override_path` plays the role of `CHROME_PATH`, `path_var` the role of
/// `PATH`. An override pointing at a missing file falls through to the other
/// strategies but is listed in the error if nothing else is found.
pub fn find_browser(
    override_path: Option<&OsStr>,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, LocateError> {
    let mut searched = Vec::new();

    // 1. Explicit override.
    if let Some(raw) = override_path.filter(|p| !p.is_empty()) {
        let p = PathBuf::from(raw);
        if is_executable(&p) {
            return Ok(p);
        }
        searched.push(format!("{CHROME_PATH_ENV}={} (not an executable file)", p.display()));
    }

    // 2. PATH lookup.
    if let Some(paths) = path_var {
        for dir in std::env::split_paths(paths) {
            for name in PATH_CANDIDATES {
                let candidate = dir.join(executable_name(name));
                if is_executable(&candidate) {
                    return Ok(candidate);
                }
            }
        }
        searched.push(format!("PATH entries for {}", PATH_CANDIDATES.join(", ")));
    }

    // 3. Well-known install locations.
    for candidate in platform_candidates() {
        if is_executable(&candidate) {
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }

    Err(LocateError::NotFound { searched })
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn executable_name(name: &str) -> OsString {
    if cfg!(windows) {
        OsString::from(format!("{name}.exe"))
    } else {
        OsString::from(name)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn platform_candidates() -> Vec<PathBuf> {
    match std::env::consts::OS {
        "macos" => vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
            PathBuf::from("/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"),
        ],
        "windows" => {
            let mut roots: Vec<PathBuf> = ["ProgramFiles", "ProgramFiles(x86)", "LOCALAPPDATA"]
                .iter()
                .filter_map(std::env::var_os)
                .map(PathBuf::from)
                .collect();
            roots.dedup();
            roots
                .into_iter()
                .flat_map(|root| {
                    [
                        root.join(r"Google\Chrome\Application\chrome.exe"),
                        root.join(r"Chromium\Application\chrome.exe"),
                        root.join(r"Microsoft\Edge\Application\msedge.exe"),
                    ]
                })
                .collect()
        }
        _ => vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/usr/local/bin/chromium"),
            PathBuf::from("/snap/bin/chromium"),
            PathBuf::from("/opt/google/chrome/chrome"),
        ],
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
