//! # Processing Pipeline
//!
//! Drives the full run: for every requested time range, slice each file and
//! apply the normalizations the selected [`Mode`] asks for. Height-mode
//! results attach to the file they were computed from; kinetic results
//! accumulate in a [`ResultStore`] for the export stage.
//!
//! The pipeline is synchronous and performs no I/O. Every error is surfaced
//! immediately; computations are deterministic, so nothing is retried.

use log::info;

use crate::extract::ExtractError;
use crate::kinetics::{kinetic_normalize, KineticError};
use crate::normalize::{height_normalize, NormalizeError};
use crate::range::{RangeError, TimeRange};
use crate::results::{HeightResult, Mode, ResultStore};
use crate::trace::{TraceError, TraceFile};

/// Errors surfaced by a processing run.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Invalid range configuration, rejected before any file is touched.
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// A file's data model was unusable.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// Window extraction failed.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// A numeric stage rejected degenerate input.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Kinetic normalization failed.
    #[error("kinetic normalization error: {0}")]
    Kinetic(#[from] KineticError),

    /// The run was asked to process no ranges.
    #[error("no time ranges were configured")]
    NoRanges,
}

/// Run the selected normalizations over every file for every range.
///
/// Height results are appended to their owning file in range-major,
/// file-minor, channel order; kinetic results accumulate in the returned
/// store in the same order. One kinetic invocation is made per range, so
/// maxima never carry over between ranges.
pub fn process(
    files: &mut [TraceFile],
    ranges: &[TimeRange],
    mode: Mode,
) -> Result<ResultStore, ProcessError> {
    if ranges.is_empty() {
        return Err(ProcessError::NoRanges);
    }

    let mut store = ResultStore::new();

    for range in ranges {
        if mode.includes_height() {
            for file in files.iter_mut() {
                let window = file.window(*range)?;
                let mut results = Vec::with_capacity(file.channels().len());
                for channel in file.channels() {
                    let points = window
                        .trace(&channel.detector)
                        .ok_or_else(|| TraceError::MissingTrace(channel.detector.clone()))?;
                    results.push(HeightResult {
                        detector: channel.detector.clone(),
                        start_time: range.start(),
                        stop_time: range.stop(),
                        time: window.time.clone(),
                        values: height_normalize(points)?,
                    });
                }
                file.append_results(results);
            }
            info!("height normalization done for range {range}");
        }

        if mode.includes_kinetic() {
            let results = kinetic_normalize(files, *range)?;
            info!(
                "kinetic normalization done for range {range}: {} curves",
                results.len()
            );
            store.extend_kinetic(results);
        }
    }

    Ok(store)
}
