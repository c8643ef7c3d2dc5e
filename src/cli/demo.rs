use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chronorm::export::write_raw_data_workbook;
use chronorm::trace::Channel;

/// Generate a synthetic detector export
pub fn run(output: PathBuf) -> Result<()> {
    info!("chronorm - synthetic detector export");

    let (time, channels, points) = generate_demo_traces();

    write_raw_data_workbook(&output, &time, &channels, &points)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {}", output.display());
    info!("  Channels: {}", channels.len());
    info!("  Points:   {}", time.len());
    info!("Try it:");
    info!("  chronorm process {} --range 5:25", output.display());

    Ok(())
}

/// A 30-minute run sampled at 0.1 min with two detector channels, each a
/// pair of Gaussian peaks on a sloping baseline.
fn generate_demo_traces() -> (Vec<f64>, Vec<Channel>, Vec<Vec<f64>>) {
    let time: Vec<f64> = (0..=300).map(|i| i as f64 * 0.1).collect();

    let uv1: Vec<f64> = time
        .iter()
        .map(|t| 12.0 + 0.05 * t + gaussian(*t, 9.0, 0.8, 140.0) + gaussian(*t, 16.5, 1.2, 60.0))
        .collect();
    let uv2: Vec<f64> = time
        .iter()
        .map(|t| 4.0 + 0.02 * t + gaussian(*t, 11.0, 0.6, 80.0) + gaussian(*t, 21.0, 1.5, 35.0))
        .collect();

    let channels = vec![
        Channel::new("1", "UV_VIS_1"),
        Channel::new("2", "UV_VIS_2"),
    ];
    (time, channels, vec![uv1, uv2])
}

fn gaussian(t: f64, center: f64, width: f64, amplitude: f64) -> f64 {
    let delta = (t - center) / width;
    amplitude * (-0.5 * delta * delta).exp()
}
