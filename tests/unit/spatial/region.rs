//! Tests for region geometry including cropping, iteration order and rings

#[cfg(test)]
mod tests {
    use greedyfill::spatial::Region;

    // Tests a centred region may start outside the image before cropping
    // Verified by clamping the corner at zero in centered
    #[test]
    fn test_centered_near_edge() {
        let region = Region::centered([1, 1], 2);
        assert_eq!(region.corner, [-1, -1]);
        assert_eq!(region.size, [5, 5]);
    }

    // Tests cropping clips a region against the image bounds
    // Verified by computing crop size from the original corner
    #[test]
    fn test_crop_to_bounds() {
        let bounds = Region::full(10, 10);
        let cropped = Region::centered([1, 1], 2).crop(&bounds);
        assert_eq!(cropped.corner, [0, 0]);
        assert_eq!(cropped.size, [4, 4]);

        let far = Region::centered([9, 9], 2).crop(&bounds);
        assert_eq!(far.corner, [7, 7]);
        assert_eq!(far.size, [3, 3]);
    }

    // Tests disjoint regions crop to an empty region
    // Verified by returning a negative-sized region for disjoint inputs
    #[test]
    fn test_crop_disjoint_is_empty() {
        let bounds = Region::full(5, 5);
        let outside = Region::new([10, 10], [3, 3]);
        let cropped = outside.crop(&bounds);
        assert!(cropped.is_empty());
        assert_eq!(cropped.number_of_pixels(), 0);
        assert!(!outside.intersects(&bounds));
    }

    // Tests pixels are produced in row-major order
    // Verified by swapping the row and column loops
    #[test]
    fn test_indices_row_major() {
        let region = Region::new([1, 2], [2, 2]);
        let pixels: Vec<[usize; 2]> = region.indices().collect();
        assert_eq!(pixels, vec![[1, 2], [1, 3], [2, 2], [2, 3]]);
    }

    // Tests the ring of a 3x3 region excludes only the centre
    // Verified by including interior pixels in the ring filter
    #[test]
    fn test_ring_indices() {
        let ring = Region::centered([5, 5], 1).ring_indices();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&[5, 5]));
        assert!(ring.contains(&[4, 4]));
        assert!(ring.contains(&[6, 6]));
    }

    // Tests containment and inside checks at the borders
    // Verified by making the end corner inclusive
    #[test]
    fn test_contains_and_inside() {
        let bounds = Region::full(4, 4);
        let region = Region::new([1, 1], [3, 3]);
        assert!(region.contains([3, 3]));
        assert!(!region.contains([4, 1]));
        assert!(region.is_inside(&bounds));
        assert!(!Region::centered([0, 0], 1).is_inside(&bounds));
    }

    // Tests expansion and translation keep the region consistent
    // Verified by expanding only the size without moving the corner
    #[test]
    fn test_expand_and_translate() {
        let region = Region::new([2, 3], [1, 1]);
        let grown = region.expand(2);
        assert_eq!(grown.corner, [0, 1]);
        assert_eq!(grown.size, [5, 5]);

        let moved = region.translate([-1, 4]);
        assert_eq!(moved.corner, [1, 7]);
        assert_eq!(moved.size, [1, 1]);
    }

    // Tests regions format as corner plus size
    // Verified by swapping rows and columns in Display
    #[test]
    fn test_display() {
        let region = Region::new([-1, 2], [3, 4]);
        assert_eq!(region.to_string(), "[-1, 2] 3x4");
    }
}
