//! # Trace File Data Model
//!
//! A [`TraceFile`] is one loaded detector export: a single retention-time
//! series, an ordered set of detector channels and one raw data series per
//! channel, all of identical length. The struct also owns the height-mode
//! results computed from it, which are appended over the file's lifetime and
//! only read afterwards by the export stage.
//!
//! Invariants are enforced at construction and the data fields are immutable
//! from then on: every numeric stage downstream assumes parallel arrays.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::extract::{extract_window, ExtractError, Window};
use crate::range::TimeRange;
use crate::results::HeightResult;

/// Errors raised while assembling or interrogating a trace file.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// A channel's data series does not line up with the time series.
    #[error("trace '{detector}' has {data_len} points but the time series has {time_len}")]
    LengthMismatch {
        /// Detector key of the offending channel.
        detector: String,
        /// Number of points in the time series.
        time_len: usize,
        /// Number of points in the channel's data series.
        data_len: usize,
    },

    /// Two channels in one file share a detector key.
    #[error("duplicate detector '{0}' in channel table")]
    DuplicateDetector(String),

    /// A declared channel has no data series.
    #[error("no data points recorded for detector '{0}'")]
    MissingTrace(String),

    /// Timestamps must not decrease.
    #[error("time series is not ordered: value at index {0} decreases")]
    UnorderedTime(usize),

    /// The time series is too short to derive a sampling step from.
    #[error("time series has {0} points, at least 2 are required to derive a time step")]
    ShortTimeSeries(usize),
}

/// One detector trace descriptor: a stable id plus the detector key under
/// which the raw points are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel identifier as declared in the source export.
    pub id: String,
    /// Detector key, e.g. `"UV_VIS_1"`. Unique within a file.
    pub detector: String,
}

impl Channel {
    /// Create a channel descriptor.
    pub fn new(id: impl Into<String>, detector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            detector: detector.into(),
        }
    }
}

/// One loaded detector export and the height-mode results computed from it.
#[derive(Debug)]
pub struct TraceFile {
    id: Uuid,
    path: PathBuf,
    time: Vec<f64>,
    channels: Vec<Channel>,
    points: HashMap<String, Vec<f64>>,
    results: Vec<HeightResult>,
}

impl TraceFile {
    /// Assemble a trace file, validating that channels are unique by detector,
    /// that every channel has a data series, that all series are parallel to
    /// the time series and that timestamps do not decrease.
    pub fn new(
        path: impl Into<PathBuf>,
        time: Vec<f64>,
        channels: Vec<Channel>,
        points: HashMap<String, Vec<f64>>,
    ) -> Result<Self, TraceError> {
        for (i, pair) in time.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(TraceError::UnorderedTime(i + 1));
            }
        }

        for (i, channel) in channels.iter().enumerate() {
            if channels[..i].iter().any(|c| c.detector == channel.detector) {
                return Err(TraceError::DuplicateDetector(channel.detector.clone()));
            }
            let data = points
                .get(&channel.detector)
                .ok_or_else(|| TraceError::MissingTrace(channel.detector.clone()))?;
            if data.len() != time.len() {
                return Err(TraceError::LengthMismatch {
                    detector: channel.detector.clone(),
                    time_len: time.len(),
                    data_len: data.len(),
                });
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            path: path.into(),
            time,
            channels,
            points,
            results: Vec::new(),
        })
    }

    /// Unique identity of this file. Disambiguates inputs that share a name.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path the file was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in logs, result records and exported sheets.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// The retention-time series.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Declared channels, in source order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Raw data series for one detector.
    pub fn trace(&self, detector: &str) -> Option<&[f64]> {
        self.points.get(detector).map(Vec::as_slice)
    }

    /// Number of time points in the file.
    pub fn point_count(&self) -> usize {
        self.time.len()
    }

    /// Uniform sampling step of the original series, `time[1] - time[0]`.
    ///
    /// Always derived from the full series as loaded, never from a window:
    /// area integration must use the file's own raw sampling step.
    pub fn time_step(&self) -> Result<f64, TraceError> {
        if self.time.len() < 2 {
            return Err(TraceError::ShortTimeSeries(self.time.len()));
        }
        Ok(self.time[1] - self.time[0])
    }

    /// Slice the time series and every channel series to `range`.
    pub fn window(&self, range: TimeRange) -> Result<Window, ExtractError> {
        let traces: Vec<(&str, &[f64])> = self
            .channels
            .iter()
            .filter_map(|c| {
                self.points
                    .get(&c.detector)
                    .map(|p| (c.detector.as_str(), p.as_slice()))
            })
            .collect();
        extract_window(&self.time, &traces, range)
    }

    /// Height-mode results computed from this file so far.
    pub fn results(&self) -> &[HeightResult] {
        &self.results
    }

    /// Append height-mode results. Results are never mutated once appended.
    pub fn append_results(&mut self, results: impl IntoIterator<Item = HeightResult>) {
        self.results.extend(results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(detector: &str, data: &[f64]) -> HashMap<String, Vec<f64>> {
        let mut map = HashMap::new();
        map.insert(detector.to_string(), data.to_vec());
        map
    }

    #[test]
    fn construction_validates_lengths() {
        let err = TraceFile::new(
            "a.xlsx",
            vec![0.0, 1.0, 2.0],
            vec![Channel::new("1", "UV")],
            points("UV", &[1.0, 2.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::LengthMismatch { .. }));
    }

    #[test]
    fn construction_rejects_duplicate_detectors() {
        let err = TraceFile::new(
            "a.xlsx",
            vec![0.0, 1.0],
            vec![Channel::new("1", "UV"), Channel::new("2", "UV")],
            points("UV", &[1.0, 2.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::DuplicateDetector(_)));
    }

    #[test]
    fn construction_rejects_missing_trace() {
        let err = TraceFile::new(
            "a.xlsx",
            vec![0.0, 1.0],
            vec![Channel::new("1", "UV"), Channel::new("2", "VIS")],
            points("UV", &[1.0, 2.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::MissingTrace(_)));
    }

    #[test]
    fn construction_rejects_decreasing_time() {
        let err = TraceFile::new(
            "a.xlsx",
            vec![0.0, 2.0, 1.0],
            vec![Channel::new("1", "UV")],
            points("UV", &[1.0, 2.0, 3.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::UnorderedTime(2)));
    }

    #[test]
    fn time_step_uses_first_pair() {
        let file = TraceFile::new(
            "a.xlsx",
            vec![0.0, 0.5, 1.0, 1.5],
            vec![Channel::new("1", "UV")],
            points("UV", &[0.0; 4]),
        )
        .unwrap();
        assert_eq!(file.time_step().unwrap(), 0.5);
    }

    #[test]
    fn time_step_requires_two_points() {
        let file = TraceFile::new("a.xlsx", vec![], vec![], HashMap::new()).unwrap();
        assert!(matches!(
            file.time_step(),
            Err(TraceError::ShortTimeSeries(0))
        ));
    }

    #[test]
    fn ids_are_unique_per_file() {
        let a = TraceFile::new("a.xlsx", vec![], vec![], HashMap::new()).unwrap();
        let b = TraceFile::new("a.xlsx", vec![], vec![], HashMap::new()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.display_name(), b.display_name());
    }
}
