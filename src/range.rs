//! Time range handling.
//!
//! A [`TimeRange`] is the closed interval `[start, stop]` used to slice every
//! loaded trace. Construction is the configuration boundary: a range that is
//! inverted, degenerate or non-finite is rejected here, before any file is
//! touched.

use std::fmt;
use std::str::FromStr;

/// Errors raised while building or parsing a time range.
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    /// The start of the range is not strictly below its stop.
    #[error("invalid time range: start {start} must be strictly below stop {stop}")]
    Inverted {
        /// Requested start time.
        start: f64,
        /// Requested stop time.
        stop: f64,
    },

    /// One of the endpoints is NaN or infinite.
    #[error("invalid time range: endpoints must be finite, got {start}..{stop}")]
    NonFinite {
        /// Requested start time.
        start: f64,
        /// Requested stop time.
        stop: f64,
    },

    /// A textual range did not have the `START:STOP` shape.
    #[error("cannot parse time range '{0}', expected START:STOP (e.g. 0:28)")]
    Unparseable(String),
}

/// A closed `[start, stop]` time interval with `start < stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    stop: f64,
}

impl TimeRange {
    /// Create a validated time range.
    pub fn new(start: f64, stop: f64) -> Result<Self, RangeError> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(RangeError::NonFinite { start, stop });
        }
        if start >= stop {
            return Err(RangeError::Inverted { start, stop });
        }
        Ok(Self { start, stop })
    }

    /// Start of the interval.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the interval.
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Whether `t` lies inside the closed interval.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.stop
    }

    /// Identity string of the range, used to group cross-file results.
    pub fn key(&self) -> String {
        format!("{} - {}", self.start, self.stop)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}

impl FromStr for TimeRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, stop) = s
            .split_once(':')
            .ok_or_else(|| RangeError::Unparseable(s.to_string()))?;
        let start: f64 = start
            .trim()
            .parse()
            .map_err(|_| RangeError::Unparseable(s.to_string()))?;
        let stop: f64 = stop
            .trim()
            .parse()
            .map_err(|_| RangeError::Unparseable(s.to_string()))?;
        Self::new(start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range() {
        let range = TimeRange::new(0.0, 28.0).unwrap();
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.stop(), 28.0);
        assert_eq!(range.key(), "0 - 28");
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            TimeRange::new(5.0, 5.0),
            Err(RangeError::Inverted { .. })
        ));
        assert!(matches!(
            TimeRange::new(10.0, 2.0),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn non_finite_endpoints_are_rejected() {
        assert!(matches!(
            TimeRange::new(f64::NAN, 1.0),
            Err(RangeError::NonFinite { .. })
        ));
        assert!(matches!(
            TimeRange::new(0.0, f64::INFINITY),
            Err(RangeError::NonFinite { .. })
        ));
    }

    #[test]
    fn parse_from_str() {
        let range: TimeRange = "0:28".parse().unwrap();
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.stop(), 28.0);

        let range: TimeRange = " 2.5 : 7.25 ".parse().unwrap();
        assert_eq!(range.start(), 2.5);
        assert_eq!(range.stop(), 7.25);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "0-28".parse::<TimeRange>(),
            Err(RangeError::Unparseable(_))
        ));
        assert!(matches!(
            "a:b".parse::<TimeRange>(),
            Err(RangeError::Unparseable(_))
        ));
        assert!(matches!(
            "28:0".parse::<TimeRange>(),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn contains_is_closed_on_both_ends() {
        let range = TimeRange::new(1.0, 2.0).unwrap();
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(!range.contains(0.999));
        assert!(!range.contains(2.001));
    }
}
