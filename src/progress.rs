//! Progress-callback trait for probe events.
//!
//! The library never prints. Instead it reports what it is doing through an
//! [`Arc<dyn ProbeProgressCallback>`] installed via
//! [`crate::config::ClientConfigBuilder::progress_callback`]. The CLI turns
//! these events into the human-readable report on stdout; library users can
//! forward them to a log, a UI, or ignore them.
//!
//! # Example
//!
//! ```rust
//! use layout_probe::{ClientConfig, ProbeProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ProbeProgressCallback for CountingCallback {
//!     fn on_artifact_written(&self, path: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote {}", path.display());
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { written: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::input::InputOrigin;
use std::path::Path;
use std::sync::Arc;

/// The two kinds of image maps a page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `markdown.images`: images referenced from the page Markdown.
    Markdown,
    /// `outputImages`: layout visualizations rendered by the service.
    Visualization,
}

/// Called by the client and the materializer as a probe runs.
///
/// All methods default to no-ops so implementors override only what they
/// need. Events arrive in order on a single task.
pub trait ProbeProgressCallback: Send + Sync {
    /// Called once the payload is built, before any network traffic.
    fn on_input_ready(&self, origin: &InputOrigin) {
        let _ = origin;
    }

    /// Called just before the POST is sent.
    fn on_request_start(&self, url: &str) {
        let _ = url;
    }

    /// Called once the HTTP status line is known.
    fn on_response_status(&self, status: u16) {
        let _ = status;
    }

    /// Called after a 200 body was parsed, before `errorCode` is checked.
    fn on_response_envelope(&self, log_id: &str, error_code: i64) {
        let _ = (log_id, error_code);
    }

    /// Called once with the number of entries in `layoutParsingResults`.
    fn on_pages_found(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before any artifact of a page is written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the response
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after `page_{i}_result.md` was written.
    ///
    /// # Arguments
    /// * `preview`     — at most the first 1500 characters of the Markdown
    /// * `total_chars` — character count of the full Markdown
    fn on_markdown_saved(&self, path: &Path, preview: &str, total_chars: usize) {
        let _ = (path, preview, total_chars);
    }

    /// Called before a non-empty image map of a page is written.
    fn on_image_group(&self, kind: ImageKind, count: usize) {
        let _ = (kind, count);
    }

    /// Called after each decoded image is written.
    fn on_artifact_written(&self, path: &Path) {
        let _ = path;
    }

    /// Called after `page_{i}_structure.json` was written.
    fn on_structure_saved(&self, path: &Path) {
        let _ = path;
    }

    /// Called after `full_response.json` was written.
    fn on_full_response_saved(&self, path: &Path) {
        let _ = path;
    }

    /// Called once all artifacts are on disk.
    fn on_complete(&self, output_dir: &Path) {
        let _ = output_dir;
    }
}

/// A no-op implementation, used when no callback is configured.
pub struct NoopProgressCallback;

impl ProbeProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn ProbeProgressCallback>;
