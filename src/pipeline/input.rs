//! Input resolution: turn the CLI's `--url` / `--image` pair into a payload.
//!
//! The service accepts either a URL it downloads itself or the document
//! bytes inline as base64. Local files are validated and read here so that a
//! bad path fails before any network traffic.

use crate::error::LayoutError;
use crate::pipeline::encode::encode_document;
use crate::request::{FileType, LayoutRequest};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sample page used when neither a URL nor a local file is given.
pub const DEMO_IMAGE_URL: &str =
    "https://paddle-model-ecology.bj.bcebos.com/paddlex/imgs/demo_image/paddleocr_vl_demo.png";

/// What the caller asked to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A remote document the service fetches itself.
    Url(String),
    /// A local image or PDF, sent inline.
    LocalFile(PathBuf),
    /// Nothing given: use [`DEMO_IMAGE_URL`].
    Demo,
}

impl InputSource {
    /// Apply the `--url` > `--image` > demo precedence. Empty values count as absent.
    pub fn from_args(image: Option<PathBuf>, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            return InputSource::Url(url);
        }
        if let Some(path) = image.filter(|p| !p.as_os_str().is_empty()) {
            return InputSource::LocalFile(path);
        }
        InputSource::Demo
    }
}

/// Where a prepared payload came from, for the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOrigin {
    Url { url: String, demo: bool },
    Local { path: PathBuf, size_bytes: u64 },
}

/// A payload ready to send plus a description of its origin.
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub request: LayoutRequest,
    pub origin: InputOrigin,
}

/// `.pdf` (any case) is a PDF; everything else is sent as an image.
pub fn file_type_for_path(path: &Path) -> FileType {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => FileType::Pdf,
        _ => FileType::Image,
    }
}

/// Build the request payload for `source`.
///
/// URL inputs are always sent with `fileType` 1: the service only downloads
/// images in that mode.
pub async fn prepare_input(
    source: &InputSource,
    visualize: bool,
) -> Result<PreparedInput, LayoutError> {
    match source {
        InputSource::Url(url) => Ok(url_input(url, false, visualize)),
        InputSource::Demo => {
            info!("No input given, using demo image {}", DEMO_IMAGE_URL);
            Ok(url_input(DEMO_IMAGE_URL, true, visualize))
        }
        InputSource::LocalFile(path) => local_input(path, visualize).await,
    }
}

fn url_input(url: &str, demo: bool, visualize: bool) -> PreparedInput {
    debug!("Using remote URL input: {}", url);
    PreparedInput {
        request: LayoutRequest {
            file: url.to_string(),
            file_type: FileType::Image,
            visualize,
        },
        origin: InputOrigin::Url {
            url: url.to_string(),
            demo,
        },
    }
}

async fn local_input(path: &Path, visualize: bool) -> Result<PreparedInput, LayoutError> {
    if !path.exists() {
        return Err(LayoutError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => LayoutError::PermissionDenied {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::NotFound => LayoutError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LayoutError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let file_type = file_type_for_path(path);
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    info!(
        "Read local {} {} ({} bytes)",
        file_type,
        absolute.display(),
        bytes.len()
    );

    Ok(PreparedInput {
        request: LayoutRequest {
            file: encode_document(&bytes),
            file_type,
            visualize,
        },
        origin: InputOrigin::Local {
            path: absolute,
            size_bytes: bytes.len() as u64,
        },
    })
}
