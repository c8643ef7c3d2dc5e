//! # Window Extraction
//!
//! Slices a time series and its parallel detector traces to a closed time
//! interval. The time series is filtered by value, then the filtered
//! window's first and last values are located back in the original series by
//! exact equality and every channel array is sliced by those indices.
//!
//! The equality lookup is deliberate and load-bearing: channel series are
//! parallel arrays indexed identically to the time series, and the window
//! boundary values are read verbatim from that same series, so an exact
//! match is guaranteed for any series a file actually loaded. Callers that
//! derive boundary values by arithmetic instead must use
//! [`extract_by_indices`] with indices they already hold.

use crate::range::TimeRange;

/// Errors raised when index resolution or slicing fails.
///
/// Every variant indicates corrupted input or a logic defect upstream, not a
/// user mistake; processing of the affected file must stop rather than
/// continue with garbage indices.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The window's first value could not be located in the original series.
    #[error("window start value {0} not found in the time series")]
    StartNotFound(f64),

    /// The window's last value could not be located in the original series.
    #[error("window stop value {0} not found in the time series")]
    StopNotFound(f64),

    /// The resolved stop index precedes the start index.
    #[error("inverted window indices: start {start_index} is past stop {stop_index}")]
    InvertedIndices {
        /// Resolved start index.
        start_index: usize,
        /// Resolved stop index.
        stop_index: usize,
    },

    /// An index points past the end of the series.
    #[error("window index {index} is out of bounds for a series of {len} points")]
    OutOfBounds {
        /// Offending index.
        index: usize,
        /// Length of the series being sliced.
        len: usize,
    },

    /// A channel series is not parallel to the time series.
    #[error("trace '{detector}' has {data_len} points but the time series has {time_len}")]
    LengthMismatch {
        /// Detector key of the offending channel.
        detector: String,
        /// Number of points in the time series.
        time_len: usize,
        /// Number of points in the channel series.
        data_len: usize,
    },
}

/// One channel's slice of an extracted window.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSlice {
    /// Detector key the slice belongs to.
    pub detector: String,
    /// Data points inside the window.
    pub points: Vec<f64>,
}

/// A time window cut out of one file: the time sub-series plus one equally
/// long sub-series per detector channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Requested (or resolved) start of the window.
    pub start_time: f64,
    /// Requested (or resolved) end of the window.
    pub stop_time: f64,
    /// Time points inside the window, in original order.
    pub time: Vec<f64>,
    /// Per-channel slices, in input channel order.
    pub traces: Vec<TraceSlice>,
}

impl Window {
    /// Number of time points in the window.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the window contains no points.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Slice for one detector, if the window carries it.
    pub fn trace(&self, detector: &str) -> Option<&[f64]> {
        self.traces
            .iter()
            .find(|t| t.detector == detector)
            .map(|t| t.points.as_slice())
    }
}

/// Extract the closed interval `[range.start, range.stop]` from `time` and
/// every parallel trace in `traces`.
///
/// Points satisfying `start <= t <= stop` are kept, both ends inclusive.
/// When no point falls inside the interval the window is empty; downstream
/// numeric stages reject empty series, extraction itself does not.
pub fn extract_window(
    time: &[f64],
    traces: &[(&str, &[f64])],
    range: TimeRange,
) -> Result<Window, ExtractError> {
    let filtered: Vec<f64> = time.iter().copied().filter(|t| range.contains(*t)).collect();

    if filtered.is_empty() {
        return Ok(Window {
            start_time: range.start(),
            stop_time: range.stop(),
            time: Vec::new(),
            traces: traces
                .iter()
                .map(|(detector, _)| TraceSlice {
                    detector: (*detector).to_string(),
                    points: Vec::new(),
                })
                .collect(),
        });
    }

    let first = filtered[0];
    let last = filtered[filtered.len() - 1];
    let (start_index, stop_index) = resolve_indices(time, first, last)?;

    let mut window = extract_by_indices(time, traces, start_index, stop_index)?;
    window.start_time = range.start();
    window.stop_time = range.stop();
    Ok(window)
}

/// Slice `time` and every parallel trace by an already-resolved index pair,
/// both ends inclusive.
pub fn extract_by_indices(
    time: &[f64],
    traces: &[(&str, &[f64])],
    start_index: usize,
    stop_index: usize,
) -> Result<Window, ExtractError> {
    if stop_index < start_index {
        return Err(ExtractError::InvertedIndices {
            start_index,
            stop_index,
        });
    }
    if stop_index >= time.len() {
        return Err(ExtractError::OutOfBounds {
            index: stop_index,
            len: time.len(),
        });
    }

    let mut slices = Vec::with_capacity(traces.len());
    for (detector, data) in traces {
        if data.len() != time.len() {
            return Err(ExtractError::LengthMismatch {
                detector: (*detector).to_string(),
                time_len: time.len(),
                data_len: data.len(),
            });
        }
        slices.push(TraceSlice {
            detector: (*detector).to_string(),
            points: data[start_index..=stop_index].to_vec(),
        });
    }

    Ok(Window {
        start_time: time[start_index],
        stop_time: time[stop_index],
        time: time[start_index..=stop_index].to_vec(),
        traces: slices,
    })
}

/// Locate the first occurrence of the window boundary values in the original
/// series. Comparison is exact: the values were read from this same series,
/// so an epsilon would only mask real corruption.
fn resolve_indices(time: &[f64], first: f64, last: f64) -> Result<(usize, usize), ExtractError> {
    let start_index = time
        .iter()
        .position(|t| *t == first)
        .ok_or(ExtractError::StartNotFound(first))?;
    let stop_index = time
        .iter()
        .position(|t| *t == last)
        .ok_or(ExtractError::StopNotFound(last))?;
    Ok((start_index, stop_index))
}
