use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chronorm::export::export_workbook;
use chronorm::pipeline::process;
use chronorm::range::TimeRange;
use chronorm::reader::load_trace_file;
use chronorm::results::Mode;

use super::{Config, ModeArg};

/// Normalize detector traces from one or more exports into a workbook
pub fn run(
    inputs: Vec<PathBuf>,
    cli_ranges: Vec<TimeRange>,
    cli_mode: Option<ModeArg>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    // CLI flags win over config file settings.
    let ranges = if cli_ranges.is_empty() {
        config.ranges()?
    } else {
        cli_ranges
    };
    if ranges.is_empty() {
        anyhow::bail!("No time ranges given; pass --range START:STOP or set ranges in a config file");
    }

    let mode = cli_mode
        .map(Mode::from)
        .or(config.processing.mode)
        .unwrap_or(Mode::Both);

    for input in &inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    let output = output.unwrap_or_else(|| PathBuf::from("chronorm_results.xlsx"));

    info!("chronorm - trace normalization");
    info!("  Inputs: {}", inputs.len());
    info!("  Ranges: {}", ranges.len());
    info!("  Mode:   {mode}");

    let mut files = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let file = load_trace_file(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        files.push(file);
    }

    let store = process(&mut files, &ranges, mode).context("Processing failed")?;

    let stats = export_workbook(&output, &files, &store, &ranges, mode)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Done: {}", output.display());
    info!("  Sheets: {}", stats.sheets_written);
    info!("  Charts: {}", stats.charts_written);
    info!("  Curves: {}", stats.curves_written);

    Ok(())
}
