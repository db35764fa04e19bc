//! Tests for default parameters and file naming constants

#[cfg(test)]
mod tests {
    use greedyfill::io::configuration::{
        DEFAULT_BLUR_VARIANCE, DEFAULT_FORWARD_LOOK_PATCHES, DEFAULT_HISTOGRAM_CANDIDATES,
        DEFAULT_PATCH_RADIUS, DEFAULT_SEED, DEFAULT_TOP_PATCHES, GIF_FRAME_DELAY_MS,
        MASK_HOLE_THRESHOLD, MASK_SUFFIX, MAX_VISIBLE_FILE_BARS, OUTPUT_SUFFIX,
        PRIORITY_SUFFIX, PROGRESS_BAR_WIDTH, VIEWER_MIN_FRAME_DELAY_MS,
    };

    // Tests default patch geometry and smoothing
    // Verified by changing the default radius
    #[test]
    fn test_patch_defaults() {
        assert_eq!(DEFAULT_PATCH_RADIUS, 4);
        assert!((DEFAULT_BLUR_VARIANCE - 2.0).abs() < f64::EPSILON);
    }

    // Tests the re-ranked head is at least as long as the kept list
    // Verified by lowering the histogram candidate count
    #[test]
    fn test_ranking_defaults() {
        assert_eq!(DEFAULT_TOP_PATCHES, 10);
        assert!(DEFAULT_HISTOGRAM_CANDIDATES >= DEFAULT_TOP_PATCHES);
        assert_eq!(DEFAULT_FORWARD_LOOK_PATCHES, 1);
    }

    // Tests progress display limits
    // Verified by changing the bar limit
    #[test]
    fn test_progress_settings() {
        assert_eq!(MAX_VISIBLE_FILE_BARS, 5);
        assert_eq!(PROGRESS_BAR_WIDTH, 50);
    }

    // Tests default seed is fixed
    // Verified by changing seed value
    #[test]
    fn test_default_seed_is_reproducible() {
        assert_eq!(DEFAULT_SEED, 42);
    }

    // Tests companion and output suffixes are distinct and filesystem safe
    // Verified by adding a special character to a suffix
    #[test]
    fn test_suffixes() {
        let suffixes = [MASK_SUFFIX, PRIORITY_SUFFIX, OUTPUT_SUFFIX];
        for suffix in suffixes {
            assert!(suffix.starts_with('_'));
            assert!(suffix.chars().all(|ch| ch.is_alphanumeric() || ch == '_'));
        }
        assert_ne!(MASK_SUFFIX, OUTPUT_SUFFIX);
        assert_ne!(MASK_SUFFIX, PRIORITY_SUFFIX);
    }

    // Tests the mask threshold splits the byte range in half
    // Verified by changing the threshold
    #[test]
    fn test_mask_threshold() {
        assert_eq!(MASK_HOLE_THRESHOLD, 127);
    }

    // Tests GIF timing values
    // Verified by changing delay value
    #[test]
    fn test_gif_frame_delay() {
        assert_eq!(GIF_FRAME_DELAY_MS, 5);
        assert!(VIEWER_MIN_FRAME_DELAY_MS > GIF_FRAME_DELAY_MS);
    }
}
