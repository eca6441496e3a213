//! Error type for the layout-probe library.
//!
//! Every failure is fatal for the run: the probe is a single linear pass,
//! so there is no page-level error channel. [`LayoutError`] groups the
//! failure modes by where they happen so callers (and the CLI) can tell a
//! missing input file from an unreachable service from an application-level
//! rejection.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the layout-probe library.
#[derive(Debug, Error)]
pub enum LayoutError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Local input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the input file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("Failed to read input file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The service could not be reached at all.
    #[error(
        "Cannot connect to the layout-parsing service at {host}: {detail}\n\
Make sure the service is running, e.g. ./start_paddleocr_vl_server.sh"
    )]
    ConnectionFailed { host: String, detail: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out (>{secs}s)\nIncrease --timeout for large documents.")]
    Timeout { secs: u64 },

    /// Any other transport-level failure (TLS, malformed URL, body read).
    #[error("HTTP request to '{url}' failed: {detail}")]
    RequestFailed { url: String, detail: String },

    // ── Response errors ───────────────────────────────────────────────────
    /// The service answered with a status other than 200.
    #[error("Service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The service answered 200 but reported a non-zero `errorCode`.
    #[error("API error {code} (logId {log_id}): {message}")]
    Api {
        code: i64,
        message: String,
        log_id: String,
    },

    /// The response body is not JSON, or `layoutParsingResults` has the wrong shape.
    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory or write an artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An embedded or visualization image is not valid base64.
    #[error("Image '{name}' on page {page} is not valid base64: {source}")]
    InvalidBase64 {
        page: usize,
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    /// An image name would escape the output directory.
    #[error("Refusing to write image '{name}': names must be relative and must not contain '..'")]
    UnsafeArtifactName { name: String },

    /// JSON serialisation of an artifact failed.
    #[error("Failed to serialise '{path}': {source}")]
    SerializeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    /// True for failures that happened before the service answered.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LayoutError::ConnectionFailed { .. }
                | LayoutError::Timeout { .. }
                | LayoutError::RequestFailed { .. }
        )
    }
}
