//! Isophote estimation on partially known images
//!
//! Isophotes are the directions of constant intensity, i.e. the image
//! gradient rotated by 90 degrees. Hole pixels carry no information, so every
//! filter here only reads valid pixels.

use ndarray::Array2;

use crate::io::configuration::GAUSSIAN_KERNEL_RADIUS;
use crate::math::gaussian::gaussian_kernel_1d;
use crate::math::vector::{norm, rotate_90};
use crate::spatial::{Mask, Raster};

/// Axis along which a derivative is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeAxis {
    /// Along rows (vertical, first vector component)
    Row,
    /// Along columns (horizontal, second vector component)
    Col,
}

impl DerivativeAxis {
    const fn step(self) -> [i64; 2] {
        match self {
            Self::Row => [1, 0],
            Self::Col => [0, 1],
        }
    }
}

/// Gaussian blur that ignores hole pixels
///
/// Each valid output pixel is the kernel-weighted mean of the valid pixels
/// in its neighbourhood, with weights renormalized over the contributing
/// pixels. Hole pixels are set to zero.
pub fn masked_blur(image: &Array2<f64>, mask: &Mask, variance: f64) -> Array2<f64> {
    let radius = GAUSSIAN_KERNEL_RADIUS;
    let kernel = gaussian_kernel_1d(variance, radius);
    let horizontal = masked_pass(image, mask, &kernel, radius, DerivativeAxis::Col);
    masked_pass(&horizontal, mask, &kernel, radius, DerivativeAxis::Row)
}

fn masked_pass(
    image: &Array2<f64>,
    mask: &Mask,
    kernel: &[f64],
    radius: usize,
    axis: DerivativeAxis,
) -> Array2<f64> {
    let step = axis.step();
    Array2::from_shape_fn(image.dim(), |(r, c)| {
        if !mask.is_valid([r, c]) {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut weight = 0.0;
        for (k, &w) in kernel.iter().enumerate() {
            let offset = k as i64 - radius as i64;
            let rr = r as i64 + offset * step[0];
            let cc = c as i64 + offset * step[1];
            if !mask.is_valid_signed(rr, cc) {
                continue;
            }
            if let Some(&value) = image.get([rr as usize, cc as usize]) {
                sum += w * value;
                weight += w;
            }
        }
        if weight > 0.0 { sum / weight } else { 0.0 }
    })
}

/// Copy of `raster` with every channel smoothed by [`masked_blur`]
pub fn masked_blur_raster(raster: &Raster, mask: &Mask, variance: f64) -> Raster {
    let channels: Vec<Array2<f64>> = (0..raster.channels())
        .map(|c| masked_blur(&raster.channel(c), mask, variance))
        .collect();
    let (rows, cols) = raster.dim();
    Raster::from_fn(rows, cols, channels.len(), |r, c, ch| {
        channels
            .get(ch)
            .and_then(|channel| channel.get([r, c]))
            .copied()
            .unwrap_or(0.0)
    })
}

/// Finite difference along one axis that only reads valid pixels
///
/// Uses a centred difference when both neighbours are valid, a one-sided
/// difference when exactly one is, and zero otherwise. Hole pixels get zero.
pub fn masked_derivative(image: &Array2<f64>, mask: &Mask, axis: DerivativeAxis) -> Array2<f64> {
    Array2::from_shape_fn(image.dim(), |(r, c)| {
        masked_derivative_at(image, mask, [r, c], axis)
    })
}

/// Single-pixel version of [`masked_derivative`]
pub fn masked_derivative_at(
    image: &Array2<f64>,
    mask: &Mask,
    pixel: [usize; 2],
    axis: DerivativeAxis,
) -> f64 {
    if !mask.is_valid(pixel) {
        return 0.0;
    }
    let step = axis.step();
    let here = image.get(pixel).copied().unwrap_or(0.0);
    let neighbour = |sign: i64| {
        let row = pixel[0] as i64 + sign * step[0];
        let col = pixel[1] as i64 + sign * step[1];
        if mask.is_valid_signed(row, col) {
            image.get([row as usize, col as usize]).copied()
        } else {
            None
        }
    };
    match (neighbour(-1), neighbour(1)) {
        (Some(before), Some(after)) => (after - before) / 2.0,
        (None, Some(after)) => after - here,
        (Some(before), None) => here - before,
        (None, None) => 0.0,
    }
}

/// Masked gradient of a scalar image as `[d/drow, d/dcol]`
pub fn masked_gradient(image: &Array2<f64>, mask: &Mask) -> Array2<[f64; 2]> {
    let d_row = masked_derivative(image, mask, DerivativeAxis::Row);
    let d_col = masked_derivative(image, mask, DerivativeAxis::Col);
    Array2::from_shape_fn(image.dim(), |(r, c)| {
        [
            d_row.get([r, c]).copied().unwrap_or(0.0),
            d_col.get([r, c]).copied().unwrap_or(0.0),
        ]
    })
}

/// Masked gradient magnitude of a scalar image
pub fn masked_gradient_magnitude(image: &Array2<f64>, mask: &Mask) -> Array2<f64> {
    masked_gradient(image, mask).mapv(norm)
}

/// Masked gradient magnitude at a single pixel
pub fn masked_gradient_magnitude_at(image: &Array2<f64>, mask: &Mask, pixel: [usize; 2]) -> f64 {
    norm([
        masked_derivative_at(image, mask, pixel, DerivativeAxis::Row),
        masked_derivative_at(image, mask, pixel, DerivativeAxis::Col),
    ])
}

/// Isophote field of a raster
///
/// The luminance is smoothed with [`masked_blur`], differentiated with
/// [`masked_derivative`] and the gradient `[g_r, g_c]` is rotated to
/// `[-g_c, g_r]`. Hole pixels have a zero isophote.
pub fn compute_isophotes(raster: &Raster, mask: &Mask, blur_variance: f64) -> Array2<[f64; 2]> {
    let smoothed = masked_blur(&raster.luminance(), mask, blur_variance);
    masked_gradient(&smoothed, mask).mapv(rotate_90)
}
