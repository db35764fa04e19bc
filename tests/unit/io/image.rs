//! Tests for PNG conversion, loading and debug image export

#[cfg(test)]
mod tests {
    use greedyfill::AlgorithmError;
    use greedyfill::io::image::{
        export_gray_png, export_raster_png, export_scalar_png, load_mask, load_priority_image,
        load_raster, mask_from_image, raster_from_image, raster_to_rgba,
    };
    use greedyfill::spatial::Raster;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
    use ndarray::{Array2, array};
    use tempfile::TempDir;

    // Tests image width and height map to columns and rows
    // Verified by swapping x and y when copying pixels
    #[test]
    fn test_raster_from_image() {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        img.put_pixel(2, 1, Rgb([200, 100, 50]));
        let raster = raster_from_image(&DynamicImage::ImageRgb8(img));

        assert_eq!(raster.dim(), (2, 3));
        assert_eq!(raster.channels(), 3);
        assert!((raster.sample([0, 0], 1) - 20.0).abs() < f64::EPSILON);
        assert!((raster.sample([1, 2], 0) - 200.0).abs() < f64::EPSILON);
    }

    // Tests bright mask pixels become holes
    // Verified by inverting the threshold comparison
    #[test]
    fn test_mask_from_image() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([0]));
        img.put_pixel(1, 0, Luma([200]));
        img.put_pixel(2, 1, Luma([127]));
        let mask = mask_from_image(&DynamicImage::ImageLuma8(img));

        assert_eq!(mask.dim(), (2, 3));
        assert!(mask.is_hole([0, 1]));
        assert!(mask.is_valid([1, 2]));
        assert_eq!(mask.hole_count(), 1);
    }

    // Tests grey rasters are replicated into RGB with opaque alpha
    // Verified by writing the grey value into the red channel only
    #[test]
    fn test_raster_to_rgba_grey() {
        let raster = Raster::uniform(2, 2, &[90.4]);
        let img = raster_to_rgba(&raster);
        assert_eq!(img.get_pixel(1, 1).0, [90, 90, 90, 255]);
    }

    // Tests an exported raster loads back unchanged
    // Verified by exporting with swapped channels
    #[test]
    fn test_export_and_load_raster() -> greedyfill::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("out.png");
        let raster = Raster::from_fn(4, 5, 3, |r, c, ch| ((r * 40 + c * 10 + ch * 3) % 256) as f64);

        export_raster_png(&raster, &path)?;
        let loaded = load_raster(&path)?;

        assert_eq!(loaded, raster);
        Ok(())
    }

    // Tests scalar images are scaled to their maximum
    // Verified by exporting unscaled values
    #[test]
    fn test_export_scalar_png() -> greedyfill::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("scalar.png");
        export_scalar_png(&array![[0.0, 0.5], [1.0, 0.25]], &path)?;

        let loaded = load_priority_image(&path)?;
        assert!(loaded[[0, 0]].abs() < f64::EPSILON);
        assert!((loaded[[1, 0]] - 255.0).abs() < f64::EPSILON);
        assert!((loaded[[0, 1]] - 128.0).abs() < f64::EPSILON);
        Ok(())
    }

    // Tests an exported grey image reads back as a mask
    // Verified by reading the mask from the red channel of an RGB copy
    #[test]
    fn test_export_gray_and_load_mask() -> greedyfill::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("mask.png");
        let mut values = Array2::<u8>::zeros((3, 3));
        values[[1, 1]] = 255;

        export_gray_png(&values, &path)?;
        let mask = load_mask(&path)?;

        assert_eq!(mask.hole_count(), 1);
        assert!(mask.is_hole([1, 1]));
        Ok(())
    }

    // Tests missing files report the path that failed
    // Verified by converting through the generic image error
    #[test]
    fn test_load_missing_file() {
        let result = load_raster(std::path::Path::new("does_not_exist.png"));
        match result {
            Err(AlgorithmError::ImageLoad { path, .. }) => {
                assert!(path.ends_with("does_not_exist.png"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
