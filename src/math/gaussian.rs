//! Gaussian kernels for separable smoothing

use ndarray::Array2;

/// Normalized 1D Gaussian kernel of length `2 * radius + 1`
///
/// A non-positive variance yields the identity kernel so callers can disable
/// smoothing without special-casing.
pub fn gaussian_kernel_1d(variance: f64, radius: usize) -> Vec<f64> {
    let len = 2 * radius + 1;
    if variance <= 0.0 || !variance.is_finite() {
        let mut kernel = vec![0.0; len];
        if let Some(center) = kernel.get_mut(radius) {
            *center = 1.0;
        }
        return kernel;
    }

    let mut kernel: Vec<f64> = (0..len)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-(x * x) / (2.0 * variance)).exp()
        })
        .collect();

    let total: f64 = kernel.iter().sum();
    if total > 0.0 {
        for weight in &mut kernel {
            *weight /= total;
        }
    }
    kernel
}

/// Separable Gaussian blur of a scalar image
///
/// Near the image edges the kernel is renormalized over the in-bounds
/// samples, so a constant image stays constant.
pub fn blur(image: &Array2<f64>, variance: f64, radius: usize) -> Array2<f64> {
    let kernel = gaussian_kernel_1d(variance, radius);
    let horizontal = convolve_axis(image, &kernel, radius, Axis1D::Cols);
    convolve_axis(&horizontal, &kernel, radius, Axis1D::Rows)
}

/// Direction of a one-dimensional convolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis1D {
    Rows,
    Cols,
}

fn convolve_axis(image: &Array2<f64>, kernel: &[f64], radius: usize, axis: Axis1D) -> Array2<f64> {
    let (rows, cols) = image.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let mut sum = 0.0;
        let mut weight = 0.0;
        for (k, &w) in kernel.iter().enumerate() {
            let offset = k as i64 - radius as i64;
            let (rr, cc) = match axis {
                Axis1D::Rows => (r as i64 + offset, c as i64),
                Axis1D::Cols => (r as i64, c as i64 + offset),
            };
            if rr < 0 || cc < 0 {
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
