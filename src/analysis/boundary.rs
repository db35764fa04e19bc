//! Fill-front tracking
//!
//! The boundary (fill front) is the set of valid pixels that touch at least
//! one hole pixel in their 8-neighbourhood. It is recomputed from the mask on
//! every iteration together with the isophotes and the front normals.

use ndarray::Array2;

use crate::analysis::isophotes::compute_isophotes;
use crate::io::configuration::GAUSSIAN_KERNEL_RADIUS;
use crate::math::gaussian::blur;
use crate::math::vector::normalize;
use crate::spatial::{Mask, Raster, Region};

/// Offsets of the 8-neighbourhood (row, col)
const NEIGHBOURS_8: [[i64; 2]; 8] = [
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];

/// Valid pixels adjacent to a hole, in row-major order
pub fn find_boundary(mask: &Mask) -> Vec<[usize; 2]> {
    mask.full_region()
        .indices()
        .filter(|&pixel| is_boundary_pixel(mask, pixel))
        .collect()
}

/// True for a valid pixel with a hole in its 8-neighbourhood
pub fn is_boundary_pixel(mask: &Mask, pixel: [usize; 2]) -> bool {
    mask.is_valid(pixel)
        && NEIGHBOURS_8.iter().any(|offset| {
            let row = pixel[0] as i64 + offset[0];
            let col = pixel[1] as i64 + offset[1];
            row >= 0 && col >= 0 && mask.is_hole([row as usize, col as usize])
        })
}

/// Boundary rendered as an 8-bit image (255 on the front, 0 elsewhere)
pub fn boundary_image(mask: &Mask) -> Array2<u8> {
    render_boundary(mask.dim(), &find_boundary(mask))
}

/// Render an already computed boundary list
pub fn render_boundary(dim: (usize, usize), boundary: &[[usize; 2]]) -> Array2<u8> {
    let mut image = Array2::zeros(dim);
    for &pixel in boundary {
        if let Some(value) = image.get_mut(pixel) {
            *value = 255;
        }
    }
    image
}

/// Unit normals of the fill front at each boundary pixel
///
/// The validity indicator (1 valid, 0 hole) is blurred and its gradient is
/// taken with centred differences, so normals point from the hole towards the
/// known region. Pixels off the boundary and flat spots get a zero normal.
pub fn compute_boundary_normals(
    mask: &Mask,
    boundary: &[[usize; 2]],
    blur_variance: f64,
) -> Array2<[f64; 2]> {
    let smoothed = blur(
        &mask.validity_indicator(),
        blur_variance,
        GAUSSIAN_KERNEL_RADIUS,
    );
    let mut normals = Array2::from_elem(mask.dim(), [0.0; 2]);
    let sample = |row: i64, col: i64| {
        if row < 0 || col < 0 {
            return None;
        }
        smoothed.get([row as usize, col as usize]).copied()
    };
    for &[row, col] in boundary {
        let (r, c) = (row as i64, col as i64);
        let here = sample(r, c).unwrap_or(0.0);
        let derivative = |before: Option<f64>, after: Option<f64>| match (before, after) {
            (Some(b), Some(a)) => (a - b) / 2.0,
            (None, Some(a)) => a - here,
            (Some(b), None) => here - b,
            (None, None) => 0.0,
        };
        let gradient = [
            derivative(sample(r - 1, c), sample(r + 1, c)),
            derivative(sample(r, c - 1), sample(r, c + 1)),
        ];
        if let Some(normal) = normals.get_mut([row, col]) {
            *normal = normalize(gradient);
        }
    }
    normals
}

/// Turn every hole pixel of `region` into a valid pixel
///
/// This is the only place the fill loop mutates the mask. Returns the number
/// of pixels that changed state.
pub fn update_mask(mask: &mut Mask, region: &Region) -> usize {
    mask.fill_region(region)
}

/// Boundary list plus the per-pixel fields derived from it
#[derive(Debug, Clone)]
pub struct BoundaryTracker {
    blur_variance: f64,
    boundary: Vec<[usize; 2]>,
    boundary_image: Array2<u8>,
    isophotes: Array2<[f64; 2]>,
    normals: Array2<[f64; 2]>,
}

impl BoundaryTracker {
    /// Empty tracker for a `rows x cols` image
    pub fn new(rows: usize, cols: usize, blur_variance: f64) -> Self {
        Self {
            blur_variance,
            boundary: Vec::new(),
            boundary_image: Array2::zeros((rows, cols)),
            isophotes: Array2::from_elem((rows, cols), [0.0; 2]),
            normals: Array2::from_elem((rows, cols), [0.0; 2]),
        }
    }

    /// Recompute the boundary, isophotes and normals for the current state
    pub fn refresh(&mut self, raster: &Raster, mask: &Mask) {
        self.boundary = find_boundary(mask);
        self.boundary_image = render_boundary(mask.dim(), &self.boundary);
        self.isophotes = compute_isophotes(raster, mask, self.blur_variance);
        self.normals = compute_boundary_normals(mask, &self.boundary, self.blur_variance);
    }

    /// Boundary pixels in row-major order
    pub fn boundary(&self) -> &[[usize; 2]] {
        &self.boundary
    }

    /// Boundary rendered as an 8-bit image
    pub const fn boundary_image(&self) -> &Array2<u8> {
        &self.boundary_image
    }

    /// Isophote field `[row, col]`
    pub const fn isophotes(&self) -> &Array2<[f64; 2]> {
        &self.isophotes
    }

    /// Unit fill-front normals `[row, col]`
    pub const fn normals(&self) -> &Array2<[f64; 2]> {
        &self.normals
    }
}
