//! Tests for pixel distances, patch differences and boundary continuity

#[cfg(test)]
mod tests {
    use greedyfill::algorithm::difference::{
        DifferenceMetric, IntroducedEnergy, average_patch_difference, boundary_continuity,
        introduced_energy,
    };
    use greedyfill::spatial::{Mask, Patch, Raster, Region};
    use ndarray::Array2;

    fn ramp() -> Raster {
        Raster::from_fn(5, 5, 1, |_, c, _| c as f64 * 10.0)
    }

    // Tests both per-pixel metrics
    // Verified by swapping the squared and absolute branches
    #[test]
    fn test_pixel_distance() {
        let a = [1.0, 2.0];
        let b = [4.0, 6.0];
        assert!((DifferenceMetric::SumSquared.pixel_distance(&a, &b) - 25.0).abs() < 1e-12);
        assert!((DifferenceMetric::SumAbsolute.pixel_distance(&a, &b) - 7.0).abs() < 1e-12);
    }

    // Tests only valid target pixels are compared
    // Verified by comparing hole pixels as well
    #[test]
    fn test_average_difference_skips_holes() {
        let mask = Mask::with_hole(5, 5, &Region::new([2, 2], [1, 1]));
        let target = Patch::new([2, 2], 1);
        let source = Patch::new([2, 3], 1);

        let squared =
            average_patch_difference(&ramp(), &mask, &target, &source, DifferenceMetric::SumSquared);
        assert_eq!(squared.compared_pixels, 8);
        assert!((squared.average - 100.0).abs() < 1e-12);

        let absolute =
            average_patch_difference(&ramp(), &mask, &target, &source, DifferenceMetric::SumAbsolute);
        assert!((absolute.average - 10.0).abs() < 1e-12);
    }

    // Tests the target is cropped to the image before comparing
    // Verified by comparing the uncropped area
    #[test]
    fn test_average_difference_cropped_target() {
        let mask = Mask::full_valid(5, 5);
        let result = average_patch_difference(
            &ramp(),
            &mask,
            &Patch::new([0, 0], 1),
            &Patch::new([2, 2], 1),
            DifferenceMetric::SumSquared,
        );
        assert_eq!(result.compared_pixels, 4);
    }

    // Tests a target without valid pixels yields zero
    // Verified by dividing by zero compared pixels
    #[test]
    fn test_average_difference_nothing_compared() {
        let mask = Mask::with_hole(5, 5, &Region::new([1, 1], [3, 3]));
        let result = average_patch_difference(
            &ramp(),
            &mask,
            &Patch::new([2, 2], 1),
            &Patch::new([2, 2], 1),
            DifferenceMetric::SumSquared,
        );
        assert_eq!(result.compared_pixels, 0);
        assert!(result.average.abs() < 1e-12);
    }

    // Tests ring comparison including isophote angles
    // Verified by comparing isophotes at the target position only
    #[test]
    fn test_boundary_continuity() {
        let raster = Raster::uniform(7, 7, &[50.0]);
        let mask = Mask::with_hole(7, 7, &Region::new([2, 2], [1, 1]));
        let target = Patch::new([2, 2], 1);
        let source = Patch::new([5, 5], 1);
        let isophotes = Array2::from_shape_fn((7, 7), |(r, c)| {
            if r < 4 && c < 4 { [1.0, 0.0] } else { [0.0, 1.0] }
        });

        let ring = boundary_continuity(
            &raster,
            &mask,
            &isophotes,
            &target,
            &source,
            DifferenceMetric::SumSquared,
        );

        let ring = ring.unwrap_or_default();
        assert_eq!(ring.compared_pixels, 8);
        assert!(ring.pixel_difference.abs() < 1e-12);
        assert!((ring.isophote_angle_difference - 0.5).abs() < 1e-9);
        assert!(ring.isophote_strength_difference.abs() < 1e-12);
    }

    // Tests a fully hole ring has no continuity score
    // Verified by returning a zero score instead of None
    #[test]
    fn test_boundary_continuity_no_valid_ring() {
        let raster = Raster::uniform(5, 5, &[0.0]);
        let mask = Mask::with_hole(5, 5, &Region::new([1, 1], [3, 3]));
        let isophotes = Array2::from_elem((5, 5), [0.0; 2]);
        let target = Patch::new([2, 2], 1);
        assert!(
            boundary_continuity(
                &raster,
                &mask,
                &isophotes,
                &target,
                &target,
                DifferenceMetric::SumAbsolute
            )
            .is_none()
        );
    }

    // Tests a copy that continues a ramp introduces no gradient change
    // Verified by comparing gradients of the unfilled image with themselves
    #[test]
    fn test_introduced_energy_on_ramp() {
        let luminance = Array2::from_shape_fn((11, 11), |(_, c)| c as f64 * 10.0);
        let mask = Mask::with_hole(11, 11, &Region::new([5, 5], [1, 1]));
        let target = Patch::new([5, 5], 1);

        let continuing = introduced_energy(&luminance, &mask, &target, &Patch::new([2, 5], 1));
        let breaking = introduced_energy(&luminance, &mask, &target, &Patch::new([5, 2], 1));

        assert_eq!(continuing.total(), 0.0);
        assert!(breaking.patch_boundary > 0.0);
        assert!(breaking.mask_boundary > 0.0);
        // A single pixel hole makes the ring and the front the same pixels
        assert!((breaking.patch_boundary - breaking.mask_boundary).abs() < 1e-12);
    }

    // Tests the two terms measure different pixel sets on a larger hole
    // Verified by measuring the front on the ring pixels
    #[test]
    fn test_introduced_energy_terms() {
        let luminance = Array2::from_shape_fn((12, 12), |(r, c)| ((r * 7 + c * 3) % 5) as f64 * 40.0);
        let mask = Mask::with_hole(12, 12, &Region::new([4, 4], [4, 4]));
        let target = Patch::new([3, 5], 2);

        let energy = introduced_energy(&luminance, &mask, &target, &Patch::new([9, 2], 2));

        assert!(energy.patch_boundary >= 0.0 && energy.mask_boundary >= 0.0);
        assert!((energy.total() - energy.patch_boundary - energy.mask_boundary).abs() < 1e-12);
        let outside = introduced_energy(&luminance, &mask, &Patch::new([30, 30], 1), &Patch::new([2, 2], 1));
        assert_eq!(outside, IntroducedEnergy::default());
    }
}
