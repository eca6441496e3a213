//! Wire payload for the layout-parsing operation.
//!
//! ```json
//! {"file": "<url or base64>", "fileType": 1, "visualize": true}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of document in the `file` field. Serialised as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FileType {
    /// `0`
    Pdf,
    /// `1`
    Image,
}

impl From<FileType> for u8 {
    fn from(t: FileType) -> Self {
        match t {
            FileType::Pdf => 0,
            FileType::Image => 1,
        }
    }
}

impl TryFrom<u8> for FileType {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(FileType::Pdf),
            1 => Ok(FileType::Image),
            other => Err(format!("unknown fileType {other}, expected 0 (PDF) or 1 (image)")),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Pdf => f.write_str("PDF"),
            FileType::Image => f.write_str("image"),
        }
    }
}

/// Body of `POST /layout-parsing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// A URL the service fetches itself, or the base64 of the document bytes.
    pub file: String,
    pub file_type: FileType,
    pub visualize: bool,
}
