//! Tests for masked smoothing, masked derivatives and isophote directions

#[cfg(test)]
mod tests {
    use greedyfill::analysis::isophotes::{
        DerivativeAxis, compute_isophotes, masked_blur, masked_blur_raster, masked_derivative,
        masked_gradient_magnitude, masked_gradient_magnitude_at,
    };
    use greedyfill::spatial::{Mask, Raster, Region};
    use ndarray::Array2;

    fn ramp() -> Array2<f64> {
        Array2::from_shape_fn((5, 5), |(_, c)| c as f64 * 10.0)
    }

    // Tests centred, one-sided and zero derivatives around holes
    // Verified by always using the centred difference
    #[test]
    fn test_masked_derivative_cases() {
        let mask = Mask::with_hole(5, 5, &Region::new([2, 2], [1, 1]));
        let d_col = masked_derivative(&ramp(), &mask, DerivativeAxis::Col);

        assert!((d_col[[0, 2]] - 10.0).abs() < 1e-12);
        assert!((d_col[[0, 0]] - 10.0).abs() < 1e-12);
        assert!((d_col[[2, 1]] - 10.0).abs() < 1e-12);
        assert!((d_col[[2, 3]] - 10.0).abs() < 1e-12);
        assert!(d_col[[2, 2]].abs() < 1e-12);

        let d_row = masked_derivative(&ramp(), &mask, DerivativeAxis::Row);
        assert!(d_row.iter().all(|v| v.abs() < 1e-12));
    }

    // Tests a valid pixel with no valid neighbours has zero derivative
    // Verified by reading hole neighbours
    #[test]
    fn test_isolated_pixel_zero_derivative() {
        let mut holes = Array2::from_elem((3, 3), true);
        holes[[1, 1]] = false;
        let mask = Mask::from_holes(&holes);
        let image = Array2::from_shape_fn((3, 3), |(r, c)| (r * 3 + c) as f64);
        assert!(masked_gradient_magnitude_at(&image, &mask, [1, 1]).abs() < 1e-12);
        assert!(masked_gradient_magnitude(&image, &mask).iter().all(|v| v.abs() < 1e-12));
    }

    // Tests hole values never leak into the blurred valid pixels
    // Verified by including hole pixels in the weighted sum
    #[test]
    fn test_masked_blur_ignores_holes() {
        let region = Region::new([1, 1], [2, 2]);
        let mask = Mask::with_hole(6, 6, &region);
        let image = Array2::from_shape_fn((6, 6), |(r, c)| {
            if region.contains([r, c]) { 1000.0 } else { 5.0 }
        });
        let blurred = masked_blur(&image, &mask, 3.0);
        for pixel in mask.full_region().indices() {
            let value = blurred[pixel];
            if mask.is_hole(pixel) {
                assert!(value.abs() < 1e-12);
            } else {
                assert!((value - 5.0).abs() < 1e-9, "{pixel:?} = {value}");
            }
        }
    }

    // Tests isophotes run along a vertical edge and vanish in holes
    // Verified by returning the unrotated gradient
    #[test]
    fn test_isophotes_follow_edge() {
        let raster = Raster::from_fn(10, 10, 1, |_, c, _| if c < 5 { 0.0 } else { 255.0 });
        let mask = Mask::with_hole(10, 10, &Region::new([8, 0], [2, 10]));
        let isophotes = compute_isophotes(&raster, &mask, 1.0);

        let at_edge = isophotes[[3, 4]];
        assert!(at_edge[1].abs() < 1e-9);
        assert!(at_edge[0] < 0.0);
        assert_eq!(isophotes[[9, 4]], [0.0, 0.0]);
    }

    // Tests every channel of a raster is blurred on its own and holes stay zero
    // Verified by blurring the luminance into every channel
    #[test]
    fn test_masked_blur_raster() {
        let raster = Raster::from_fn(6, 6, 2, |_, c, ch| if ch == 0 { 40.0 } else { c as f64 * 10.0 });
        let mask = Mask::with_hole(6, 6, &Region::new([2, 2], [1, 1]));

        let blurred = masked_blur_raster(&raster, &mask, 1.0);

        assert_eq!(blurred.channels(), 2);
        assert!((blurred.sample([0, 0], 0) - 40.0).abs() < 1e-9);
        assert_eq!(blurred.sample([2, 2], 0), 0.0);
        assert!(blurred.sample([0, 0], 1) > 0.0);
        assert!(blurred.sample([0, 5], 1) < 50.0);
    }
}
