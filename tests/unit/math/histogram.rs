//! Tests for fixed-bin histograms, normalization and L1 distance

#[cfg(test)]
mod tests {
    use greedyfill::math::histogram::Histogram;

    // Tests samples land in evenly spaced bins with the maximum in the last bin
    // Verified by letting the maximum overflow to a new bin
    #[test]
    fn test_binning() {
        let histogram = Histogram::from_samples(&[0.0, 0.4, 0.6, 1.0], 2, 0.0, 1.0, false);
        assert_eq!(histogram.bins(), &[2.0, 2.0]);
    }

    // Tests out-of-range samples are dropped or clamped depending on the flag
    // Verified by always clamping outside samples
    #[test]
    fn test_outside_samples() {
        let samples = [-1.0, 0.5, 2.0];
        let dropped = Histogram::from_samples(&samples, 2, 0.0, 1.0, false);
        assert!((dropped.total() - 1.0).abs() < f64::EPSILON);

        let clamped = Histogram::from_samples(&samples, 2, 0.0, 1.0, true);
        assert_eq!(clamped.bins(), &[1.0, 2.0]);
    }

    // Tests a degenerate range puts accepted samples into the first bin
    // Verified by dividing by the zero range
    #[test]
    fn test_degenerate_range() {
        let histogram = Histogram::from_samples(&[3.0, 3.0], 4, 3.0, 3.0, false);
        assert_eq!(histogram.bins(), &[2.0, 0.0, 0.0, 0.0]);
    }

    // Tests normalization and the empty histogram edge case
    // Verified by dividing an empty histogram by its zero total
    #[test]
    fn test_normalize() {
        let normalized = Histogram::from_bins(vec![1.0, 3.0]).normalized();
        assert_eq!(normalized.bins(), &[0.25, 0.75]);

        let empty = Histogram::zeros(3).normalized();
        assert!(empty.bins().iter().all(|v| v.abs() < f64::EPSILON));
    }

    // Tests L1 distance and appending per-channel histograms
    // Verified by using squared differences
    #[test]
    fn test_append_and_difference() {
        let mut a = Histogram::from_bins(vec![1.0, 0.0]);
        a.append(&Histogram::from_bins(vec![0.5, 0.5]));
        assert_eq!(a.len(), 4);

        let b = Histogram::from_bins(vec![0.0, 1.0, 0.5, 0.5]);
        assert!((a.difference(&b) - 2.0).abs() < f64::EPSILON);
        assert!(a.difference(&a).abs() < f64::EPSILON);
    }
}
