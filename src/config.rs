//! Configuration types for HTML/text-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The same config drives a single-file
//! conversion and a whole batch, so the naming policy, page geometry and
//! browser settings are guaranteed to be uniform across every file of a run.

use crate::error::TopdfError;
use crate::pipeline::naming::OutputNaming;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Millimetres per inch; the DevTools print API takes inches.
const MM_PER_INCH: f64 = 25.4;

/// A4 paper in millimetres.
const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use topdf::{ConversionConfig, MarginPreset, OutputNaming};
///
/// let config = ConversionConfig::builder()
///     .naming(OutputNaming::StripExtension)
///     .margins(MarginPreset::Narrow)
///     .scale(0.9)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// How output paths are derived from input paths. Default: [`OutputNaming::Append`].
    ///
    /// Applies to the whole batch, never per file.
    pub naming: OutputNaming,

    /// Left/right margin preset. Default: [`MarginPreset::Standard`].
    pub margins: MarginPreset,

    /// Print scale factor. Range: 0.1–2.0. Default: 0.8.
    ///
    /// Values below 1.0 shrink the rendered content so more of it fits on
    /// each A4 page.
    pub scale: f64,

    /// Run Chrome with its process sandbox enabled. Default: false.
    ///
    /// Containers and CI runners frequently lack the kernel features the
    /// sandbox requires, so it is off unless asked for. This is a
    /// portability setting, not a security boundary.
    pub sandbox: bool,

    /// Explicit browser executable. If None, located via `chrome-locate`.
    pub browser_executable: Option<PathBuf>,

    /// Upper bound on the wait for content to settle, in seconds. Default: None.
    ///
    /// `None` waits as long as the page takes (fonts, images, stylesheets
    /// referenced by the markup). Set a bound when converting untrusted
    /// documents that may reference slow or unreachable hosts.
    pub settle_timeout_secs: Option<u64>,

    /// Receives batch and per-file events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            naming: OutputNaming::default(),
            margins: MarginPreset::default(),
            scale: 0.8,
            sandbox: false,
            browser_executable: None,
            settle_timeout_secs: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("naming", &self.naming)
            .field("margins", &self.margins)
            .field("scale", &self.scale)
            .field("sandbox", &self.sandbox)
            .field("browser_executable", &self.browser_executable)
            .field("settle_timeout_secs", &self.settle_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Page geometry handed to the rendering backend.
    pub fn page_layout(&self) -> PageLayout {
        PageLayout::a4(self.margins, self.scale)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn naming(mut self, naming: OutputNaming) -> Self {
        self.config.naming = naming;
        self
    }

    pub fn margins(mut self, margins: MarginPreset) -> Self {
        self.config.margins = margins;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn sandbox(mut self, enabled: bool) -> Self {
        self.config.sandbox = enabled;
        self
    }

    pub fn browser_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.browser_executable = Some(path.into());
        self
    }

    pub fn settle_timeout_secs(mut self, secs: u64) -> Self {
        self.config.settle_timeout_secs = Some(secs);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, TopdfError> {
        let c = &self.config;
        if !(0.1..=2.0).contains(&c.scale) {
            return Err(TopdfError::InvalidConfig(format!(
                "scale must be 0.1–2.0, got {}",
                c.scale
            )));
        }
        if c.settle_timeout_secs == Some(0) {
            return Err(TopdfError::InvalidConfig(
                "settle timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Left/right margin preset. Top and bottom are always 20 mm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarginPreset {
    /// 20 mm on every side. (default)
    #[default]
    Standard,
    /// 20 mm top/bottom, 5 mm left/right; wide tables and code fit better.
    Narrow,
}

impl MarginPreset {
    /// Side margin in millimetres.
    pub fn side_mm(self) -> f64 {
        match self {
            MarginPreset::Standard => 20.0,
            MarginPreset::Narrow => 5.0,
        }
    }
}

/// Printable page geometry, in inches as the DevTools protocol expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    pub margin_top_in: f64,
    pub margin_bottom_in: f64,
    pub margin_left_in: f64,
    pub margin_right_in: f64,
    pub scale: f64,
    pub print_background: bool,
}

impl PageLayout {
    /// A4 portrait with backgrounds, 20 mm top/bottom and the preset's sides.
    pub fn a4(margins: MarginPreset, scale: f64) -> Self {
        let side = mm_to_in(margins.side_mm());
        Self {
            paper_width_in: mm_to_in(A4_WIDTH_MM),
            paper_height_in: mm_to_in(A4_HEIGHT_MM),
            margin_top_in: mm_to_in(20.0),
            margin_bottom_in: mm_to_in(20.0),
            margin_left_in: side,
            margin_right_in: side,
            scale,
            print_background: true,
        }
    }
}

fn mm_to_in(mm: f64) -> f64 {
    mm / MM_PER_INCH
}
