//! Tests for the source patch index and its incremental growth

#[cfg(test)]
mod tests {
    use greedyfill::algorithm::candidates::SourcePatchIndex;
    use greedyfill::spatial::{Mask, Patch, Region};

    fn holed() -> Mask {
        Mask::with_hole(7, 7, &Region::new([3, 3], [1, 1]))
    }

    // Tests only in-bounds patches without holes are indexed
    // Verified by not cropping the patch test to the image
    #[test]
    fn test_build_skips_holes_and_edges() {
        let index = SourcePatchIndex::build(&holed(), 1);
        assert_eq!(index.len(), 16);
        assert_eq!(index.radius(), 1);
        assert_eq!(index.patches().first().map(|p| p.center), Some([1, 1]));
        assert!(!index.contains([0, 0]));
        assert!(!index.contains([3, 3]));
        assert!(index.contains([1, 5]));
        assert!(!index.contains([1, 50]));
    }

    // Tests filling a hole exposes new patches in row-major order
    // Verified by skipping the re-sort after adding patches
    #[test]
    fn test_add_new_in_region() {
        let mut mask = holed();
        let mut index = SourcePatchIndex::build(&mask, 1);
        let filled = Region::new([3, 3], [1, 1]);
        mask.fill_region(&filled);

        let added = index.add_new_in_region(&mask, &filled);

        assert_eq!(added, 9);
        assert_eq!(index.len(), 25);
        assert!(index.contains([3, 3]));
        let centers: Vec<[usize; 2]> = index.patches().iter().map(|p| p.center).collect();
        let mut sorted = centers.clone();
        sorted.sort_unstable();
        assert_eq!(centers, sorted);
        assert_eq!(index.add_new_in_region(&mask, &filled), 0);
    }

    // Tests a mask without any usable patch gives an empty index
    // Verified by indexing patches that extend past the image
    #[test]
    fn test_empty_index() {
        let index = SourcePatchIndex::build(&Mask::full_valid(2, 2), 1);
        assert!(index.is_empty());
        assert!(SourcePatchIndex::empty(4, 4, 1).is_empty());
    }

    // Tests the search window restricts candidate centres
    // Verified by ignoring the search radius
    #[test]
    fn test_candidates_for_window() {
        let mask = Mask::full_valid(9, 9);
        let index = SourcePatchIndex::build(&mask, 1);
        let target = Patch::new([4, 4], 1);

        assert_eq!(index.candidates_for(&target, None).len(), 49);
        let near = index.candidates_for(&target, Some(1));
        assert_eq!(near.len(), 9);
        assert!(near.iter().all(|p| p.center[0].abs_diff(4) <= 1));
    }
}
