use anyhow::{Context, Result};
use std::path::PathBuf;

use chronorm::reader::{load_trace_file, FileSummary};

/// Display information about a detector export
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let trace_file = load_trace_file(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = FileSummary::from_file(&trace_file);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Detector Export Information");
    println!("===========================");
    println!("File: {}", summary.path);
    println!();
    println!("Channels: {}", summary.channel_count);
    for (i, detector) in summary.detectors.iter().enumerate() {
        println!("  {:3}. {}", i + 1, detector);
    }
    println!();
    println!("Time points: {}", summary.points);
    if let (Some(start), Some(stop)) = (summary.time_start, summary.time_stop) {
        println!("Time span:   {start} - {stop} min");
    }
    if let Some(step) = summary.time_step {
        println!("Time step:   {step} min");
    }

    Ok(())
}
