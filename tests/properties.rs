//! Property tests for the extraction and normalization primitives.

use proptest::prelude::*;

use chronorm::extract::extract_window;
use chronorm::normalize::height_normalize;
use chronorm::range::TimeRange;

proptest! {
    /// Extraction keeps exactly the points inside the closed interval, in
    /// original order, and every trace slice matches the time slice length.
    #[test]
    fn extraction_keeps_exactly_the_in_range_points(
        mut time in proptest::collection::vec(0.0f64..1000.0, 1..200),
        a in 0.0f64..1000.0,
        b in 0.0f64..1000.0,
    ) {
        time.sort_by(|x, y| x.partial_cmp(y).expect("finite"));
        let data: Vec<f64> = (0..time.len()).map(|i| i as f64).collect();

        let (start, stop) = if a < b { (a, b) } else { (b, a) };
        prop_assume!(start < stop);
        let range = TimeRange::new(start, stop).expect("validated above");

        let window = extract_window(&time, &[("X", &data)], range).expect("extraction");

        let expected: Vec<f64> = time
            .iter()
            .copied()
            .filter(|t| *t >= start && *t <= stop)
            .collect();
        prop_assert_eq!(&window.time, &expected);
        for slice in &window.traces {
            prop_assert_eq!(slice.points.len(), window.time.len());
        }
    }

    /// A non-constant series height-normalizes into [0, 1] with the minimum
    /// at exactly 0 and the peak at exactly 1.
    #[test]
    fn height_normalization_is_bounded(
        values in proptest::collection::vec(-1.0e6f64..1.0e6, 2..200),
    ) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max > min);

        let curve = height_normalize(&values).expect("non-constant series");

        let curve_min = curve.iter().copied().fold(f64::INFINITY, f64::min);
        let curve_max = curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!((curve_min - 0.0).abs() < 1e-9);
        prop_assert!((curve_max - 1.0).abs() < 1e-9);
        for value in &curve {
            prop_assert!(*value >= -1e-9 && *value <= 1.0 + 1e-9);
        }
    }
}
