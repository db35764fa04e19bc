//! PNG loading and export of rasters, masks and scalar debug images

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use ndarray::{Array2, Array3};

use crate::io::configuration::MASK_HOLE_THRESHOLD;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::{Mask, Raster};

fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| AlgorithmError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Convert a decoded image to an RGB raster on the `[0, 255]` scale
pub fn raster_from_image(img: &DynamicImage) -> Raster {
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let mut samples = Array3::<u8>::zeros((height, width, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            if let Some(sample) = samples.get_mut((y as usize, x as usize, c)) {
                *sample = value;
            }
        }
    }
    Raster::from_array(&samples)
}

/// Hole mask from a decoded image: luminance above the threshold is a hole
pub fn mask_from_image(img: &DynamicImage) -> Mask {
    let luma = img.to_luma8();
    let holes = Array2::from_shape_fn(
        (luma.height() as usize, luma.width() as usize),
        |(r, c)| {
            luma.get_pixel_checked(c as u32, r as u32)
                .is_some_and(|p| p.0[0] > MASK_HOLE_THRESHOLD)
        },
    );
    Mask::from_holes(&holes)
}

/// Load a PNG as an RGB raster
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_raster(path: &Path) -> Result<Raster> {
    Ok(raster_from_image(&open(path)?))
}

/// Load a PNG mask, where bright pixels mark the holes
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_mask(path: &Path) -> Result<Mask> {
    Ok(mask_from_image(&open(path)?))
}

/// Load a grey-level manual priority image on the `[0, 255]` scale
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_priority_image(path: &Path) -> Result<Array2<f64>> {
    let luma = open(path)?.to_luma8();
    Ok(Array2::from_shape_fn(
        (luma.height() as usize, luma.width() as usize),
        |(r, c)| {
            luma.get_pixel_checked(c as u32, r as u32)
                .map_or(0.0, |p| f64::from(p.0[0]))
        },
    ))
}

fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Render a raster as RGBA; grey rasters are replicated into RGB
pub fn raster_to_rgba(raster: &Raster) -> RgbaImage {
    let (rows, cols) = raster.dim();
    let alpha_channel = (raster.channels() >= 4).then_some(3);
    let mut img = ImageBuffer::new(cols as u32, rows as u32);
    for [row, col] in raster.full_region().indices() {
        let [r, g, b] = raster.color3([row, col]).map(to_byte);
        let a = alpha_channel.map_or(255, |c| to_byte(raster.sample([row, col], c)));
        img.put_pixel(col as u32, row as u32, Rgba([r, g, b, a]));
    }
    img
}

fn ensure_parent(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}

/// Export a raster as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_raster_png(raster: &Raster, output_path: &Path) -> Result<()> {
    ensure_parent(output_path)?;
    raster_to_rgba(raster)
        .save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Export a scalar image as grey levels, scaled so its maximum is white
///
/// All-zero (or non-positive) images export as black.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_scalar_png(values: &Array2<f64>, output_path: &Path) -> Result<()> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
    let bytes = values.mapv(|v| if v.is_finite() { to_byte(v * scale) } else { 0 });
    export_gray_png(&bytes, output_path)
}

/// Export an 8-bit single channel image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_gray_png(values: &Array2<u8>, output_path: &Path) -> Result<()> {
    ensure_parent(output_path)?;
    let (rows, cols) = values.dim();
    let mut img = GrayImage::new(cols as u32, rows as u32);
    for ((row, col), &value) in values.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([value]));
    }
    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
