//! # Kinetic Normalization
//!
//! The cross-file, two-pass normalization: every (file, channel) curve in
//! one time range is first scaled so its integrated area matches the largest
//! area seen for that detector across the whole file set, then scaled again
//! by the largest peak the area-normalized curves reach. Curves from the
//! set are thereby comparable against a single shared reference, which a
//! per-file normalization cannot provide.
//!
//! All per-invocation state (the chunk list and both per-detector maxima
//! maps) lives in an accumulator constructed inside [`kinetic_normalize`],
//! so one range's maxima can never leak into the next range's coefficients
//! and concurrent invocations for different ranges are safe by construction.

use std::collections::HashMap;

use log::debug;
use uuid::Uuid;

use crate::extract::ExtractError;
use crate::normalize::{shift_min_to_zero, trapezoid_area, NormalizeError};
use crate::range::TimeRange;
use crate::results::KineticResult;
use crate::trace::{TraceError, TraceFile};

/// Errors raised during a kinetic normalization invocation.
#[derive(Debug, thiserror::Error)]
pub enum KineticError {
    /// Window extraction failed.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// A numeric stage rejected degenerate input.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// A file's data model was unusable.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// A chunk integrated to zero area, so no area coefficient exists.
    #[error("integrated area for detector '{detector}' in '{file}' is zero, curves cannot be area-normalized")]
    ZeroArea {
        /// File the chunk came from.
        file: String,
        /// Detector of the offending chunk.
        detector: String,
    },

    /// No maximum was recorded for a detector that produced a chunk.
    #[error("no recorded maximum for detector '{0}'")]
    MissingMaximum(String),
}

/// Per-detector maxima folded across all files of one invocation.
#[derive(Debug, Default)]
struct ChannelMaxima {
    area: HashMap<String, f64>,
    height: HashMap<String, f64>,
}

impl ChannelMaxima {
    fn fold_area(&mut self, detector: &str, area: f64) {
        let entry = self.area.entry(detector.to_string()).or_insert(area);
        *entry = entry.max(area);
    }

    fn fold_height(&mut self, detector: &str, height: f64) {
        let entry = self.height.entry(detector.to_string()).or_insert(height);
        *entry = entry.max(height);
    }

    fn area_for(&self, detector: &str) -> Result<f64, KineticError> {
        self.area
            .get(detector)
            .copied()
            .ok_or_else(|| KineticError::MissingMaximum(detector.to_string()))
    }

    fn height_for(&self, detector: &str) -> Result<f64, KineticError> {
        self.height
            .get(detector)
            .copied()
            .ok_or_else(|| KineticError::MissingMaximum(detector.to_string()))
    }
}

/// One (file, channel) pair's intermediate data within an invocation.
#[derive(Debug)]
struct Chunk {
    file_id: Uuid,
    file_name: String,
    detector: String,
    time: Vec<f64>,
    shifted: Vec<f64>,
    area: f64,
}

/// Kinetically normalize every channel of every file over one time range.
///
/// Phases run strictly in sequence:
/// 1. collect min-shifted windows and integrated areas, folding per-detector
///    area maxima;
/// 2. scale each curve by `max_area / area` for its detector;
/// 3. fold the peaks of the area-normalized curves into per-detector height
///    maxima;
/// 4. divide each curve by its detector's height maximum and emit results.
///
/// Emitted results mirror input file/channel order; the export layout
/// depends on that ordering.
pub fn kinetic_normalize(
    files: &[TraceFile],
    range: TimeRange,
) -> Result<Vec<KineticResult>, KineticError> {
    let mut maxima = ChannelMaxima::default();
    let mut chunks = Vec::new();

    // Phase 1: collect chunks and fold area maxima.
    for file in files {
        let dt = file.time_step()?;
        let window = file.window(range)?;
        for channel in file.channels() {
            let points = window
                .trace(&channel.detector)
                .ok_or_else(|| TraceError::MissingTrace(channel.detector.clone()))?;
            let shifted = shift_min_to_zero(points)?;
            let area = trapezoid_area(&shifted, dt)?;
            maxima.fold_area(&channel.detector, area);
            chunks.push(Chunk {
                file_id: file.id(),
                file_name: file.display_name(),
                detector: channel.detector.clone(),
                time: window.time.clone(),
                shifted,
                area,
            });
        }
    }
    debug!(
        "kinetic {}: collected {} chunks across {} files",
        range,
        chunks.len(),
        files.len()
    );

    // Phase 2: area-normalize every chunk against its detector's set-wide
    // maximum. The chunk holding the maximum gets a coefficient of exactly 1.
    let mut area_normalized = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        if chunk.area == 0.0 {
            return Err(KineticError::ZeroArea {
                file: chunk.file_name.clone(),
                detector: chunk.detector.clone(),
            });
        }
        let coeff = maxima.area_for(&chunk.detector)? / chunk.area;
        let curve: Vec<f64> = chunk.shifted.iter().map(|p| p * coeff).collect();
        area_normalized.push(curve);
    }

    // Phase 3: fold post-area-normalization height maxima.
    for (chunk, curve) in chunks.iter().zip(&area_normalized) {
        let peak = curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        maxima.fold_height(&chunk.detector, peak);
    }

    // Phase 4: height-normalize and emit in input order.
    let mut results = Vec::with_capacity(chunks.len());
    for (chunk, curve) in chunks.iter().zip(&area_normalized) {
        let max_height = maxima.height_for(&chunk.detector)?;
        results.push(KineticResult {
            file_id: chunk.file_id,
            file_name: chunk.file_name.clone(),
            range_key: range.key(),
            detector: chunk.detector.clone(),
            start_time: range.start(),
            stop_time: range.stop(),
            time: chunk.time.clone(),
            values: curve.iter().map(|p| p / max_height).collect(),
        });
    }
    debug!("kinetic {}: emitted {} results", range, results.len());

    Ok(results)
}
