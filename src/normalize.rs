//! # Baseline Normalization Math
//!
//! The small numeric vocabulary every processing mode is built from:
//! min-shift, unit-max scaling, their composition (height normalization) and
//! trapezoidal area integration with an implicit leading zero baseline.
//!
//! All operations are pure and reject degenerate input instead of emitting
//! NaN or infinity: minimum, maximum and area are undefined on an empty
//! series, and a constant channel has no peak to scale by.

/// Errors raised by the baseline math on degenerate input.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Minimum, maximum and area are undefined on an empty series.
    #[error("cannot normalize an empty series")]
    EmptySeries,

    /// The series is constant after min-shifting, so there is no peak to
    /// scale to unit height.
    #[error("series has a zero maximum after baseline shift, cannot scale to unit height")]
    ZeroPeak,

    /// The sampling step passed to area integration is unusable.
    #[error("invalid time step {0}, must be finite and positive")]
    InvalidTimeStep(f64),
}

/// Subtract the series minimum from every point.
pub fn shift_min_to_zero(series: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    if series.is_empty() {
        return Err(NormalizeError::EmptySeries);
    }
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    Ok(series.iter().map(|x| x - min).collect())
}

/// Divide every point by the series maximum.
pub fn scale_to_unit_max(series: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    if series.is_empty() {
        return Err(NormalizeError::EmptySeries);
    }
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        return Err(NormalizeError::ZeroPeak);
    }
    Ok(series.iter().map(|x| x / max).collect())
}

/// Height normalization: min-shift, then scale to unit maximum.
///
/// The result of a non-constant series is bounded in `[0, 1]` with the
/// minimum at exactly 0 and the peak at exactly 1.
pub fn height_normalize(series: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    scale_to_unit_max(&shift_min_to_zero(series)?)
}

/// Trapezoidal area under a min-shifted series sampled at a uniform step.
///
/// The first trapezoid runs from a virtual zero value to the first real
/// point, so a series `[0, 2, 0]` at `dt = 1` integrates to exactly 2.
/// `dt` must be the sampling step of the original, unsliced series the
/// window was cut from; recomputing it per window would skew comparisons
/// between files recorded at different resolutions.
pub fn trapezoid_area(series: &[f64], dt: f64) -> Result<f64, NormalizeError> {
    if series.is_empty() {
        return Err(NormalizeError::EmptySeries);
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(NormalizeError::InvalidTimeStep(dt));
    }

    let mut area = 0.0;
    let mut previous = 0.0;
    for &point in series {
        area += (previous + point) * dt * 0.5;
        previous = point;
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn shift_moves_minimum_to_zero() {
        let shifted = shift_min_to_zero(&[5.0, 7.0, 9.0, 6.0]).unwrap();
        assert_eq!(shifted, vec![0.0, 2.0, 4.0, 1.0]);
    }

    #[test]
    fn shift_handles_negative_baselines() {
        let shifted = shift_min_to_zero(&[-3.0, -1.0, -2.0]).unwrap();
        assert_eq!(shifted, vec![0.0, 2.0, 1.0]);
    }

    #[test]
    fn height_normalize_bounds() {
        let curve = height_normalize(&[5.0, 7.0, 9.0, 6.0]).unwrap();
        let min = curve.iter().copied().fold(f64::INFINITY, f64::min);
        let max = curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(min, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_series_is_a_domain_error() {
        assert!(matches!(
            shift_min_to_zero(&[]),
            Err(NormalizeError::EmptySeries)
        ));
        assert!(matches!(
            scale_to_unit_max(&[]),
            Err(NormalizeError::EmptySeries)
        ));
        assert!(matches!(
            trapezoid_area(&[], 1.0),
            Err(NormalizeError::EmptySeries)
        ));
    }

    #[test]
    fn constant_series_has_no_peak() {
        assert!(matches!(
            height_normalize(&[4.2, 4.2, 4.2]),
            Err(NormalizeError::ZeroPeak)
        ));
    }

    #[test]
    fn area_of_triangle_pulse() {
        // Leading trapezoid from the virtual zero baseline counts as well:
        // (0+0)/2 + (0+2)/2 + (2+0)/2 = 2.
        let area = trapezoid_area(&[0.0, 2.0, 0.0], 1.0).unwrap();
        assert_relative_eq!(area, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn area_scales_with_time_step() {
        let unit = trapezoid_area(&[0.0, 3.0, 1.0, 0.0], 1.0).unwrap();
        let half = trapezoid_area(&[0.0, 3.0, 1.0, 0.0], 0.5).unwrap();
        assert_relative_eq!(unit, 2.0 * half, epsilon = 1e-12);
        assert_relative_eq!(unit, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn area_rejects_bad_time_step() {
        assert!(matches!(
            trapezoid_area(&[1.0], 0.0),
            Err(NormalizeError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            trapezoid_area(&[1.0], -0.1),
            Err(NormalizeError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            trapezoid_area(&[1.0], f64::NAN),
            Err(NormalizeError::InvalidTimeStep(_))
        ));
    }
}
