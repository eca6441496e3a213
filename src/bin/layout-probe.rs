//! CLI binary for layout-probe.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! renders progress events as a report on stdout, and turns any error into
//! a diagnostic plus exit status 1.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use layout_probe::{
    probe, ClientConfig, ImageKind, InputOrigin, InputSource, ProbeProgressCallback,
    ProgressCallback, DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, PREVIEW_CHARS,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn rule(c: char) -> String {
    c.to_string().repeat(50)
}

// ── CLI report callback ──────────────────────────────────────────────────────

/// Prints the run report on stdout and shows a spinner on stderr while the
/// request is in flight (parsing a PDF can take minutes).
struct CliReporter {
    spinner_enabled: bool,
    spinner: Mutex<Option<ProgressBar>>,
    request_started: Mutex<Option<Instant>>,
}

impl CliReporter {
    fn new(spinner_enabled: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner_enabled,
            spinner: Mutex::new(None),
            request_started: Mutex::new(None),
        })
    }

    fn start_spinner(&self) {
        if !self.spinner_enabled {
            return;
        }
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Parsing");
        bar.set_message("waiting for the service…");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(bar);
        }
    }

    fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            bar.finish_and_clear();
        }
    }
}

// Transport failures never reach `on_response_status`.
impl Drop for CliReporter {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

impl ProbeProgressCallback for CliReporter {
    fn on_input_ready(&self, origin: &InputOrigin) {
        match origin {
            InputOrigin::Url { url, demo } => {
                if *demo {
                    println!("No input given, using the built-in demo image:");
                }
                println!("Mode:      remote URL");
                println!("Image URL: {url}");
            }
            InputOrigin::Local { path, size_bytes } => {
                println!("Mode:      local file");
                println!("File path: {}", path.display());
                println!("File size: {size_bytes} bytes");
            }
        }
    }

    fn on_request_start(&self, url: &str) {
        println!("\nAPI endpoint: {url}");
        println!("Calling API...");
        println!("{}", rule('-'));
        if let Ok(mut t) = self.request_started.lock() {
            *t = Some(Instant::now());
        }
        self.start_spinner();
    }

    fn on_response_status(&self, status: u16) {
        self.stop_spinner();
        let elapsed = self
            .request_started
            .lock()
            .ok()
            .and_then(|t| *t)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        println!("Status code: {status}  {}", dim(&format!("{elapsed:.1}s")));
    }

    fn on_response_envelope(&self, log_id: &str, error_code: i64) {
        println!("Log ID:      {log_id}");
        println!("Error code:  {error_code}");
        if error_code == 0 {
            println!("{}", green("✓ API call succeeded!"));
            println!("{}", rule('-'));
        }
    }

    fn on_pages_found(&self, total_pages: usize) {
        println!("\nParsed result: {total_pages} page(s)");
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        println!("\n{}", bold(&format!("=== Page {page_num} ===")));
    }

    fn on_markdown_saved(&self, path: &Path, preview: &str, total_chars: usize) {
        println!("Markdown saved: {}", path.display());
        println!("\n--- Markdown preview ---");
        println!("{preview}");
        if total_chars > PREVIEW_CHARS {
            println!("... ({total_chars} characters total, truncated)");
        }
        println!("--- End of preview ---");
    }

    fn on_image_group(&self, kind: ImageKind, count: usize) {
        let label = match kind {
            ImageKind::Markdown => "Markdown images",
            ImageKind::Visualization => "Visualization images",
        };
        println!("\n{label}: {count}");
    }

    fn on_artifact_written(&self, path: &Path) {
        println!("  - {}", path.display());
    }

    fn on_structure_saved(&self, path: &Path) {
        println!("\nStructured result saved: {}", path.display());
    }

    fn on_full_response_saved(&self, path: &Path) {
        println!("\nFull response saved: {}", path.display());
    }

    fn on_complete(&self, output_dir: &Path) {
        println!("\n{}", rule('='));
        println!("All results saved to: {}", bold(&output_dir.display().to_string()));
        println!("{}", rule('='));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse the built-in demo image
  layout-probe

  # Parse a local image or PDF
  layout-probe --image /path/to/page.jpg
  layout-probe --image report.pdf --output report_out

  # Let the service download the image itself
  layout-probe --url https://example.com/page.png

  # Talk to a service on another machine
  layout-probe --host http://10.0.0.5:58811 --image scan.png

OUTPUT FILES (under --output):
  page_{i}_result.md         Markdown of page i (0-indexed)
  page_{i}_{image_name}      images referenced by the Markdown
  page_{i}_{name}.jpg        layout visualizations
  page_{i}_structure.json    pruned structured result
  full_response.json         the complete API response

ENVIRONMENT VARIABLES:
  LAYOUT_PROBE_HOST       Override --host
  LAYOUT_PROBE_OUTPUT     Override --output
  LAYOUT_PROBE_TIMEOUT    Override --timeout
  RUST_LOG                tracing filter for stderr logs (e.g. layout_probe=debug)
"#;

/// Probe a layout-parsing service with one image or PDF.
#[derive(Parser, Debug)]
#[command(
    name = "layout-probe",
    version,
    about = "Send an image or PDF to a layout-parsing service and save the results",
    long_about = "Send an image or PDF (local file or URL) to a layout-parsing HTTP service \
(POST /layout-parsing) and write the returned Markdown, images, visualizations and \
structured JSON to an output directory. With no input, a demo image is used.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image or PDF file to upload.
    #[arg(long, env = "LAYOUT_PROBE_IMAGE")]
    image: Option<PathBuf>,

    /// Remote image URL for the service to download (takes precedence over --image).
    #[arg(long, env = "LAYOUT_PROBE_URL")]
    url: Option<String>,

    /// Output directory.
    #[arg(short, long, env = "LAYOUT_PROBE_OUTPUT", default_value = "api_output")]
    output: PathBuf,

    /// API base URL.
    #[arg(long, env = "LAYOUT_PROBE_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Request timeout in seconds.
    #[arg(long, env = "LAYOUT_PROBE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Disable the spinner shown while waiting for the service.
    #[arg(long, env = "LAYOUT_PROBE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "LAYOUT_PROBE_VERBOSE")]
    verbose: bool,

    /// Suppress the report; print only the written file paths, or the failure.
    #[arg(short, long, env = "LAYOUT_PROBE_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The report goes to stdout; tracing stays on stderr and is quiet by
    // default so the two never interleave.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{} {:#}", red("✗ Error:"), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let reporter: Option<ProgressCallback> = if cli.quiet {
        None
    } else {
        Some(CliReporter::new(!cli.no_progress) as ProgressCallback)
    };

    let config = build_config(cli, reporter)?;

    if !cli.quiet {
        println!("{}", rule('='));
        println!("{}", bold("Layout-parsing API probe"));
        println!("{}", rule('='));
    }

    let source = InputSource::from_args(cli.image.clone(), cli.url.clone());
    let outcome = probe(&source, &cli.output, &config)
        .await
        .context("Layout probe failed")?;

    if cli.quiet {
        for path in &outcome.summary.files {
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder()
        .host(cli.host.clone())
        .timeout_secs(cli.timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
