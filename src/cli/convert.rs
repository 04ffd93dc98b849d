use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use xydata::{export_plain_text, ExportOptions, Registry};

/// Read `input` and write it to `output` as commented, tab-separated text.
pub fn run(
    registry: &Registry,
    input: &Path,
    output: &Path,
    format: Option<&str>,
    options: &[String],
    export: &ExportOptions,
) -> Result<()> {
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    if let Some(name) = format {
        info!("Format: {} (forced)", name);
    }

    let dataset = registry.load_file(input, format, options)?;
    info!(
        "Read {} block(s) as {}",
        dataset.block_count(),
        dataset.format().name
    );

    export_plain_text(&dataset, output, export)
        .with_context(|| format!("Failed to export to {}", output.display()))?;
    info!("Conversion complete");
    Ok(())
}
