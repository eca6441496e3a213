//! Result types returned by a probe run.

use crate::pipeline::input::InputOrigin;
use serde::Serialize;
use std::path::PathBuf;

/// What [`crate::pipeline::materialize::save_results`] put on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    /// Output directory as passed in; every entry of `files` starts with it.
    pub output_dir: PathBuf,
    /// Entries in `layoutParsingResults`.
    pub pages: usize,
    /// Every file written, in write order. `full_response.json` is last.
    pub files: Vec<PathBuf>,
}

impl OutputSummary {
    /// Files whose name starts with `page_`.
    pub fn page_artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().filter(|p| {
            p.strip_prefix(&self.output_dir)
                .ok()
                .and_then(|rel| rel.to_str())
                .is_some_and(|rel| rel.starts_with("page_"))
        })
    }
}

/// Outcome of [`crate::probe::probe`].
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub input: InputOrigin,
    pub log_id: String,
    pub summary: OutputSummary,
}
