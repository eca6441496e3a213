//! One complete probe: resolve input, call the service, save the results.

use crate::client::LayoutClient;
use crate::config::ClientConfig;
use crate::error::LayoutError;
use crate::output::ProbeOutcome;
use crate::pipeline::input::{prepare_input, InputSource};
use crate::pipeline::materialize::save_results;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Run the whole pipeline for `source`, writing artifacts under `output_dir`.
///
/// Stages run strictly in order and the first error aborts the run: a
/// missing local file never reaches the network, and a failed call never
/// touches `output_dir`.
pub async fn probe(
    source: &InputSource,
    output_dir: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<ProbeOutcome, LayoutError> {
    let start = Instant::now();
    let output_dir = output_dir.as_ref();

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let prepared = prepare_input(source, config.visualize).await?;
    config.progress().on_input_ready(&prepared.origin);

    // ── Step 2: Call the service ─────────────────────────────────────────
    let client = LayoutClient::new(config.clone())?;
    let response = client.call(&prepared.request).await?;

    // ── Step 3: Materialize ──────────────────────────────────────────────
    let summary = save_results(&response, output_dir, config.progress()).await?;

    info!(
        "Probe finished: {} pages, {} files in {}ms",
        summary.pages,
        summary.files.len(),
        start.elapsed().as_millis()
    );

    Ok(ProbeOutcome {
        input: prepared.origin,
        log_id: response.log_id,
        summary,
    })
}
