//! Tests for patch geometry and source/target pair offsets

#[cfg(test)]
mod tests {
    use greedyfill::spatial::{Patch, PatchPair, Region};

    // Tests a patch covers a square of side 2r+1 around its centre
    // Verified by using r+1 as the side length
    #[test]
    fn test_patch_geometry() {
        let patch = Patch::new([5, 6], 2);
        assert_eq!(patch.side(), 5);
        assert_eq!(patch.area(), 25);
        assert_eq!(patch.region, Region::new([3, 4], [5, 5]));
    }

    // Tests pair offsets map target pixels onto source pixels
    // Verified by swapping source and target in the offset
    #[test]
    fn test_pair_offsets() {
        let pair = PatchPair::new(Patch::new([2, 3], 1), Patch::new([7, 1], 1));
        assert_eq!(pair.target_to_source_offset(), [-5, 2]);
        assert!(pair.scores.lookahead_score.is_none());
    }

    // Tests patches display their centre and radius
    // Verified by omitting the radius
    #[test]
    fn test_display() {
        assert_eq!(Patch::new([1, 2], 3).to_string(), "(1, 2) r=3");
    }

    // Tests the summed difference scales the average by the compared pixels
    // Verified by returning the average unchanged
    #[test]
    fn test_total_difference() {
        let mut pair = PatchPair::new(Patch::new([2, 3], 1), Patch::new([7, 1], 1));
        pair.scores.average_difference = 2.5;
        pair.scores.compared_pixels = 4;
        assert_eq!(pair.scores.total_difference(), 10.0);
        assert!(pair.scores.introduced_energy.is_none());
    }
}
