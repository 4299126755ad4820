//! CLI binary for topdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use topdf::{
    convert, derive_output, run_batch, BatchProgressCallback, BatchSummary, ConversionConfig,
    ConversionOutcome, FileResult, MarginPreset, OutputNaming, ProgressCallback,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar anchored at the bottom of the
/// terminal plus one log line per file.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Looking for HTML files…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} HTML files"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        self.bar.set_message(input.display().to_string());
    }

    fn on_file_converted(&self, index: usize, total: usize, _input: &Path, output: &Path) {
        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {}",
            green("✓"),
            index,
            total,
            output.display()
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, index: usize, total: usize, _input: &Path, output: &Path) {
        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {}",
            dim("–"),
            index,
            total,
            dim(&format!("{} (exists)", output.display()))
        ));
        self.bar.inc(1);
    }

    fn on_file_failed(&self, index: usize, total: usize, input: &Path, error: &str) {
        // Keep one line per file even for multi-line errors.
        let first_line = error.lines().next().unwrap_or(error);
        let msg = if first_line.chars().count() > 100 {
            format!("{}\u{2026}", first_line.chars().take(99).collect::<String>())
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {}  {}",
            red("✗"),
            index,
            total,
            input.display(),
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        self.bar.finish_and_clear();
        print_summary(summary);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one HTML file
  topdf -i report.html -o report.pdf

  # Convert a text file; output name derived (notes.txt.pdf)
  topdf -i notes.txt

  # Convert every .html/.htm under docs/, writing docs/**/<name>.html.pdf
  topdf -d docs

  # Same, but docs/**/<name>.pdf
  topdf -d docs --strip-extension

  # Narrow side margins, larger print scale
  topdf -d docs --margins narrow --scale 1.0

  # Machine-readable report
  topdf -d docs --json > report.json

BEHAVIOUR:
  Existing outputs are never overwritten: the file is reported as skipped,
  so re-running a batch only converts what is new.
  In batch mode a failing file is reported and the batch continues; the
  exit status is 0 unless the directory itself is unusable or the browser
  cannot start.

ENVIRONMENT VARIABLES:
  TOPDF_CHROME            Browser executable (same as --chrome)
  CHROME_PATH             Browser executable used when --chrome is not set
  RUST_LOG                tracing filter, e.g. RUST_LOG=topdf=debug

SETUP:
  topdf drives a local Chrome or Chromium. It is looked up on PATH and in the
  usual install locations. The browser sandbox is off by default so topdf
  works inside containers; pass --sandbox to turn it on.
"#;

/// Convert HTML and TXT files to PDF using headless Chrome.
#[derive(Parser, Debug)]
#[command(
    name = "topdf",
    version,
    about = "Convert HTML and TXT files to PDF using headless Chrome",
    long_about = "Convert HTML and plain-text documents to PDF by printing them with a headless \
Chrome/Chromium. Convert a single file, or a whole directory tree of HTML files with one shared \
browser.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(clap::ArgGroup::new("mode").required(true).args(["input", "dir"]))
)]
struct Cli {
    /// Input file path (.html, .htm or .txt).
    #[arg(short, long, env = "TOPDF_INPUT")]
    input: Option<PathBuf>,

    /// Output PDF path. Derived from the input when omitted.
    #[arg(short, long, env = "TOPDF_OUTPUT", requires = "input")]
    output: Option<PathBuf>,

    /// Convert every HTML file under this directory.
    #[arg(short, long, env = "TOPDF_DIR", conflicts_with = "input")]
    dir: Option<PathBuf>,

    /// Name outputs report.pdf instead of report.html.pdf.
    #[arg(long, env = "TOPDF_STRIP_EXTENSION")]
    strip_extension: bool,

    /// Left/right margins: standard (20mm) or narrow (5mm).
    #[arg(long, env = "TOPDF_MARGINS", value_enum, default_value = "standard")]
    margins: MarginArg,

    /// Print scale factor (0.1–2.0).
    #[arg(long, env = "TOPDF_SCALE", default_value_t = 0.8)]
    scale: f64,

    /// Keep Chrome's process sandbox enabled.
    #[arg(long, env = "TOPDF_SANDBOX")]
    sandbox: bool,

    /// Chrome/Chromium executable to use.
    #[arg(long, env = "TOPDF_CHROME")]
    chrome: Option<PathBuf>,

    /// Give up on a page whose content has not settled after this many seconds.
    #[arg(long, env = "TOPDF_SETTLE_TIMEOUT")]
    settle_timeout: Option<u64>,

    /// Print a JSON report instead of human-readable output.
    #[arg(long, env = "TOPDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "TOPDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TOPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TOPDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum MarginArg {
    Standard,
    Narrow,
}

impl From<MarginArg> for MarginPreset {
    fn from(v: MarginArg) -> Self {
        match v {
            MarginArg::Standard => MarginPreset::Standard,
            MarginArg::Narrow => MarginPreset::Narrow,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs in batch mode.
    let show_progress = cli.dir.is_some() && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Batch mode ───────────────────────────────────────────────────────
    if let Some(ref dir) = cli.dir {
        let summary = run_batch(dir, &config)
            .await
            .context("Batch conversion failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise report")?
            );
        } else if !cli.quiet && !show_progress {
            print_summary(&summary);
        }
        return Ok(());
    }

    // ── Single-file mode ─────────────────────────────────────────────────
    let input = cli
        .input
        .clone()
        .context("either --input or --dir is required")?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output(&input, config.naming));

    let start = Instant::now();
    let outcome = convert(&input, &output, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let report = FileResult {
            input,
            output,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        match outcome {
            ConversionOutcome::Skipped => eprintln!(
                "{}  {} already exists, nothing to do",
                dim("–"),
                bold(&output.display().to_string())
            ),
            _ => eprintln!(
                "{}  {}ms  →  {}",
                green("✔"),
                start.elapsed().as_millis(),
                bold(&output.display().to_string())
            ),
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let naming = if cli.strip_extension {
        OutputNaming::StripExtension
    } else {
        OutputNaming::Append
    };

    let mut builder = ConversionConfig::builder()
        .naming(naming)
        .margins(cli.margins.clone().into())
        .scale(cli.scale)
        .sandbox(cli.sandbox);

    if let Some(ref chrome) = cli.chrome {
        builder = builder.browser_executable(chrome);
    }
    if let Some(secs) = cli.settle_timeout {
        builder = builder.settle_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(summary: &BatchSummary) {
    let mark = if summary.failed == 0 {
        green("✔")
    } else if summary.converted + summary.skipped == 0 {
        red("✘")
    } else {
        yellow("⚠")
    };

    eprintln!(
        "{} Found {} HTML files, converted {}  ({} skipped, {} failed)  {}",
        mark,
        bold(&summary.files_found.to_string()),
        bold(&summary.converted.to_string()),
        summary.skipped,
        if summary.failed == 0 {
            "0".to_string()
        } else {
            red(&summary.failed.to_string())
        },
        dim(&format!("{}ms", summary.duration_ms)),
    );
    for failure in summary.failures() {
        if let ConversionOutcome::Failed { ref reason } = failure.outcome {
            eprintln!("   {} {}: {}", red("✗"), failure.input.display(), reason);
        }
    }
}
