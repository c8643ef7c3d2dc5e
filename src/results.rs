//! # Result Records and Accumulation
//!
//! Plain data records produced by the normalization stages, plus the
//! [`ResultStore`] the export stage reads kinetic results from. Height-mode
//! results live on the [`TraceFile`](crate::trace::TraceFile) they were
//! computed from; kinetic results are inherently cross-file and accumulate
//! here, keyed by detector and range identity.

use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

/// Which normalizations a processing run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Per-file height normalization only.
    Height,
    /// Cross-file kinetic normalization only.
    Kinetic,
    /// Both normalizations.
    Both,
}

impl Mode {
    /// Whether the run computes height-normalized curves.
    pub fn includes_height(self) -> bool {
        matches!(self, Mode::Height | Mode::Both)
    }

    /// Whether the run computes kinetic-normalized curves.
    pub fn includes_kinetic(self) -> bool {
        matches!(self, Mode::Kinetic | Mode::Both)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Height => write!(f, "height"),
            Mode::Kinetic => write!(f, "kinetic"),
            Mode::Both => write!(f, "both"),
        }
    }
}

/// One height-normalized curve for one (channel, range) of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightResult {
    /// Detector the curve was computed from.
    pub detector: String,
    /// Requested window start.
    pub start_time: f64,
    /// Requested window stop.
    pub stop_time: f64,
    /// Time points of the window.
    pub time: Vec<f64>,
    /// Height-normalized values, bounded in `[0, 1]`.
    pub values: Vec<f64>,
}

/// One kinetic-normalized curve for one (file, channel) within one range
/// invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticResult {
    /// Identity of the file the curve came from.
    pub file_id: Uuid,
    /// Display name of the file the curve came from.
    pub file_name: String,
    /// Identity string of the range invocation, e.g. `"0 - 28"`.
    pub range_key: String,
    /// Detector the curve was computed from.
    pub detector: String,
    /// Requested window start.
    pub start_time: f64,
    /// Requested window stop.
    pub stop_time: f64,
    /// Time points of the window.
    pub time: Vec<f64>,
    /// Area-then-height normalized values.
    pub values: Vec<f64>,
}

/// Accumulates kinetic results across range invocations for export.
///
/// Detectors and range keys are tracked in first-seen order, which mirrors
/// input order and drives the exported sheet/chart layout.
#[derive(Debug, Default)]
pub struct ResultStore {
    kinetic: Vec<KineticResult>,
    detectors: Vec<String>,
    range_keys: Vec<String>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one kinetic result, recording its detector and range key.
    pub fn push_kinetic(&mut self, result: KineticResult) {
        if !self.detectors.iter().any(|d| *d == result.detector) {
            self.detectors.push(result.detector.clone());
        }
        if !self.range_keys.iter().any(|k| *k == result.range_key) {
            self.range_keys.push(result.range_key.clone());
        }
        self.kinetic.push(result);
    }

    /// Append every result of one kinetic invocation.
    pub fn extend_kinetic(&mut self, results: impl IntoIterator<Item = KineticResult>) {
        for result in results {
            self.push_kinetic(result);
        }
    }

    /// Detectors seen so far, in first-seen order.
    pub fn detectors(&self) -> &[String] {
        &self.detectors
    }

    /// Range keys seen so far, in first-seen order.
    pub fn range_keys(&self) -> &[String] {
        &self.range_keys
    }

    /// All kinetic results, in insertion order.
    pub fn kinetic(&self) -> &[KineticResult] {
        &self.kinetic
    }

    /// Kinetic results for one detector and range key, in insertion order.
    pub fn kinetic_for<'a>(
        &'a self,
        detector: &'a str,
        range_key: &'a str,
    ) -> impl Iterator<Item = &'a KineticResult> + 'a {
        self.kinetic
            .iter()
            .filter(move |r| r.detector == detector && r.range_key == range_key)
    }

    /// Whether no kinetic results have been stored.
    pub fn is_empty(&self) -> bool {
        self.kinetic.is_empty()
    }

    /// Drop all accumulated kinetic state. For callers that reuse one store
    /// across independent processing runs.
    pub fn clear_kinetic(&mut self) {
        self.kinetic.clear();
        self.detectors.clear();
        self.range_keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(file: &str, detector: &str, key: &str) -> KineticResult {
        KineticResult {
            file_id: Uuid::new_v4(),
            file_name: file.to_string(),
            range_key: key.to_string(),
            detector: detector.to_string(),
            start_time: 0.0,
            stop_time: 1.0,
            time: vec![0.0, 1.0],
            values: vec![0.0, 1.0],
        }
    }

    #[test]
    fn detectors_and_keys_keep_first_seen_order() {
        let mut store = ResultStore::new();
        store.push_kinetic(result("a", "UV", "0 - 1"));
        store.push_kinetic(result("a", "VIS", "0 - 1"));
        store.push_kinetic(result("b", "UV", "1 - 2"));
        store.push_kinetic(result("b", "VIS", "1 - 2"));

        assert_eq!(store.detectors(), ["UV", "VIS"]);
        assert_eq!(store.range_keys(), ["0 - 1", "1 - 2"]);
    }

    #[test]
    fn query_filters_by_detector_and_key() {
        let mut store = ResultStore::new();
        store.push_kinetic(result("a", "UV", "0 - 1"));
        store.push_kinetic(result("b", "UV", "0 - 1"));
        store.push_kinetic(result("a", "VIS", "0 - 1"));
        store.push_kinetic(result("a", "UV", "1 - 2"));

        let names: Vec<_> = store
            .kinetic_for("UV", "0 - 1")
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut store = ResultStore::new();
        store.push_kinetic(result("a", "UV", "0 - 1"));
        store.clear_kinetic();

        assert!(store.is_empty());
        assert!(store.detectors().is_empty());
        assert!(store.range_keys().is_empty());
    }

    #[test]
    fn mode_flags() {
        assert!(Mode::Height.includes_height());
        assert!(!Mode::Height.includes_kinetic());
        assert!(Mode::Kinetic.includes_kinetic());
        assert!(!Mode::Kinetic.includes_height());
        assert!(Mode::Both.includes_height() && Mode::Both.includes_kinetic());
    }

    #[test]
    fn mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: Mode,
        }
        let wrapper: Wrapper = toml::from_str("mode = \"kinetic\"").unwrap();
        assert_eq!(wrapper.mode, Mode::Kinetic);
    }
}
