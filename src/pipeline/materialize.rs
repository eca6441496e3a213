//! Result materialization: write a successful response to a directory.
//!
//! Layout per page `i` (0-indexed):
//!
//! ```text
//! page_{i}_result.md         Markdown text (skipped when empty)
//! page_{i}_{image_name}      each markdown.images entry, decoded
//! page_{i}_{name}.jpg        each outputImages entry, decoded
//! page_{i}_structure.json    prunedResult (skipped when empty)
//! full_response.json         the whole response, always written last
//! ```
//!
//! There is no rollback: if one write fails, the files already written stay.

use crate::error::LayoutError;
use crate::output::OutputSummary;
use crate::pipeline::encode::decode_image;
use crate::progress::{ImageKind, ProbeProgressCallback};
use crate::response::{is_empty_value, LayoutResponse};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Characters of Markdown handed to the preview callback.
pub const PREVIEW_CHARS: usize = 1500;

/// Name of the verbatim response dump.
pub const FULL_RESPONSE_FILE: &str = "full_response.json";

/// Write every artifact of `response` under `output_dir`, creating it if needed.
pub async fn save_results(
    response: &LayoutResponse,
    output_dir: &Path,
    progress: &dyn ProbeProgressCallback,
) -> Result<OutputSummary, LayoutError> {
    let pages = response.pages()?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| LayoutError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let mut summary = OutputSummary {
        output_dir: output_dir.to_path_buf(),
        pages: pages.len(),
        files: Vec::new(),
    };
    info!("Saving {} pages to {}", pages.len(), output_dir.display());
    progress.on_pages_found(pages.len());

    for (i, page) in pages.iter().enumerate() {
        progress.on_page_start(i + 1, pages.len());

        let text = &page.markdown.text;
        if !text.is_empty() {
            let path = output_dir.join(format!("page_{i}_result.md"));
            write_file(&path, text.as_bytes()).await?;
            let (preview, total_chars) = markdown_preview(text, PREVIEW_CHARS);
            progress.on_markdown_saved(&path, preview, total_chars);
            summary.files.push(path);
        }

        let written =
            save_image_map(output_dir, i, &page.markdown.images, ImageKind::Markdown, progress)
                .await?;
        summary.files.extend(written);

        let written = save_image_map(
            output_dir,
            i,
            &page.output_images,
            ImageKind::Visualization,
            progress,
        )
        .await?;
        summary.files.extend(written);

        if !is_empty_value(&page.pruned_result) {
            let path = output_dir.join(format!("page_{i}_structure.json"));
            write_json(&path, &page.pruned_result).await?;
            progress.on_structure_saved(&path);
            summary.files.push(path);
        }
    }

    let path = output_dir.join(FULL_RESPONSE_FILE);
    write_json(&path, response.raw()).await?;
    progress.on_full_response_saved(&path);
    summary.files.push(path);

    let absolute = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
    progress.on_complete(&absolute);
    Ok(summary)
}

/// First `limit` characters of `text` and its total character count.
pub fn markdown_preview(text: &str, limit: usize) -> (&str, usize) {
    let total = text.chars().count();
    match text.char_indices().nth(limit) {
        Some((cut, _)) => (&text[..cut], total),
        None => (text, total),
    }
}

/// File name of image `name` of page `page` for the given kind.
fn image_file_name(page: usize, name: &str, kind: ImageKind) -> String {
    match kind {
        ImageKind::Markdown => format!("page_{page}_{name}"),
        ImageKind::Visualization => format!("page_{page}_{name}.jpg"),
    }
}

/// `file_name` is the path `name` is written to, relative to the output
/// directory. It must stay inside that directory and end in a file name.
fn check_artifact_path(file_name: &str, name: &str) -> Result<(), LayoutError> {
    let mut depth = 0usize;
    let mut safe = true;
    for component in Path::new(file_name).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => depth -= 1,
            _ => {
                safe = false;
                break;
            }
        }
    }
    let ends_in_file = matches!(
        Path::new(file_name).components().next_back(),
        Some(Component::Normal(_))
    );
    if safe && depth > 0 && ends_in_file {
        Ok(())
    } else {
        Err(LayoutError::UnsafeArtifactName {
            name: name.to_string(),
        })
    }
}

async fn save_image_map(
    output_dir: &Path,
    page: usize,
    images: &Map<String, Value>,
    kind: ImageKind,
    progress: &dyn ProbeProgressCallback,
) -> Result<Vec<PathBuf>, LayoutError> {
    if images.is_empty() {
        return Ok(Vec::new());
    }
    progress.on_image_group(kind, images.len());

    let mut written = Vec::with_capacity(images.len());
    for (name, b64) in images {
        let b64 = b64.as_str().ok_or_else(|| {
            LayoutError::InvalidResponse(format!(
                "image '{name}' on page {page} is not a base64 string"
            ))
        })?;
        let bytes = decode_image(page, name, b64)?;

        let file_name = image_file_name(page, name, kind);
        check_artifact_path(&file_name, name)?;
        let path = output_dir.join(file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LayoutError::OutputWriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        write_file(&path, &bytes).await?;
        progress.on_artifact_written(&path);
        written.push(path);
    }
    Ok(written)
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), LayoutError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| LayoutError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Two-space indented JSON; non-ASCII text is written as-is.
async fn write_json(path: &Path, value: &Value) -> Result<(), LayoutError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| {
        LayoutError::SerializeFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    write_file(path, json.as_bytes()).await
}
