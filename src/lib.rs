//! # layout-probe
//!
//! Send an image or PDF to a layout-parsing service (PaddleOCR-VL style
//! `POST /layout-parsing`) and save everything it returns: per-page
//! Markdown, embedded images, layout visualizations, the pruned structured
//! result, and the raw response.
//!
//! ## Pipeline Overview
//!
//! ```text
//! --url / --image / demo
//!  │
//!  ├─ 1. Input        URL pass-through or local file → base64 payload
//!  ├─ 2. Request      one POST, 300 s timeout, status + errorCode checks
//!  └─ 3. Materialize  page_{i}_* artifacts + full_response.json
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layout_probe::{probe, ClientConfig, InputSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .host("http://127.0.0.1:58811")
//!         .build()?;
//!     let source = InputSource::LocalFile("scan.png".into());
//!     let outcome = probe(&source, "api_output", &config).await?;
//!     eprintln!("{} pages, {} files", outcome.summary.pages, outcome.summary.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `layout-probe` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod request;
pub mod response;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::LayoutClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_HOST, DEFAULT_TIMEOUT_SECS};
pub use error::LayoutError;
pub use output::{OutputSummary, ProbeOutcome};
pub use pipeline::input::{prepare_input, InputOrigin, InputSource, PreparedInput, DEMO_IMAGE_URL};
pub use pipeline::materialize::{save_results, FULL_RESPONSE_FILE, PREVIEW_CHARS};
pub use probe::probe;
pub use progress::{ImageKind, NoopProgressCallback, ProbeProgressCallback, ProgressCallback};
pub use request::{FileType, LayoutRequest};
pub use response::{LayoutResponse, MarkdownResult, PageResult};
