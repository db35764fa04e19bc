//! Dense multi-channel raster storage
//!
//! Samples are stored as `f64` on a `[0, 255]` scale in a
//! `(rows, cols, channels)` array so that every comparison and derivative in
//! the algorithm works on one numeric type regardless of the input format.

use ndarray::{Array2, Array3, ArrayView1, Axis};
use num_traits::ToPrimitive;

use crate::spatial::mask::Mask;
use crate::spatial::region::Region;

/// Rec. 601 luma weights applied to the first three channels
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// A `rows x cols` grid of pixels with a fixed number of channels
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Array3<f64>,
}

impl Raster {
    /// Zero-filled raster
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            data: Array3::zeros((rows, cols, channels)),
        }
    }

    /// Raster where every pixel has the given colour
    pub fn uniform(rows: usize, cols: usize, color: &[f64]) -> Self {
        let channels = color.len();
        Self {
            data: Array3::from_shape_fn((rows, cols, channels), |(_, _, c)| {
                color.get(c).copied().unwrap_or(0.0)
            }),
        }
    }

    /// Raster built from a per-sample function of (row, col, channel)
    pub fn from_fn<F>(rows: usize, cols: usize, channels: usize, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f64,
    {
        Self {
            data: Array3::from_shape_fn((rows, cols, channels), |(r, c, ch)| f(r, c, ch)),
        }
    }

    /// Convert any primitive sample array into a raster
    ///
    /// Samples that cannot be represented as `f64` become zero.
    pub fn from_array<T>(samples: &Array3<T>) -> Self
    where
        T: ToPrimitive + Copy,
    {
        Self {
            data: samples.mapv(|v| v.to_f64().unwrap_or(0.0)),
        }
    }

    /// Grid dimensions (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        let (rows, cols, _) = self.data.dim();
        (rows, cols)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.dim().1
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// Region covering the whole raster
    pub fn full_region(&self) -> Region {
        Region::full(self.rows(), self.cols())
    }

    /// Borrow the underlying sample array
    pub const fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// View of one pixel's channels, `None` outside the grid
    pub fn pixel(&self, pixel: [usize; 2]) -> Option<ArrayView1<'_, f64>> {
        (pixel[0] < self.rows() && pixel[1] < self.cols())
            .then(|| self.data.slice(ndarray::s![pixel[0], pixel[1], ..]))
    }

    /// Single sample, zero outside the grid
    pub fn sample(&self, pixel: [usize; 2], channel: usize) -> f64 {
        self.data
            .get([pixel[0], pixel[1], channel])
            .copied()
            .unwrap_or(0.0)
    }

    /// Overwrite one pixel's channels; extra values are ignored
    pub fn set_pixel(&mut self, pixel: [usize; 2], values: &[f64]) {
        for (channel, &value) in values.iter().enumerate() {
            if let Some(sample) = self.data.get_mut([pixel[0], pixel[1], channel]) {
                *sample = value;
            }
        }
    }

    /// Copy of a single channel as a 2D array
    pub fn channel(&self, channel: usize) -> Array2<f64> {
        if channel < self.channels() {
            self.data.index_axis(Axis(2), channel).to_owned()
        } else {
            Array2::zeros(self.dim())
        }
    }

    /// Luminance image
    ///
    /// Uses Rec. 601 weights for three or more channels and the channel mean
    /// otherwise.
    pub fn luminance(&self) -> Array2<f64> {
        let channels = self.channels();
        let (rows, cols) = self.dim();
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            if channels >= 3 {
                LUMA_WEIGHTS
                    .iter()
                    .enumerate()
                    .map(|(ch, w)| w * self.sample([r, c], ch))
                    .sum()
            } else if channels > 0 {
                (0..channels).map(|ch| self.sample([r, c], ch)).sum::<f64>() / channels as f64
            } else {
                0.0
            }
        })
    }

    /// Colour of a pixel as three components, replicating grey samples
    pub fn color3(&self, pixel: [usize; 2]) -> [f64; 3] {
        match self.channels() {
            0 => [0.0; 3],
            1 | 2 => {
                let v = self.sample(pixel, 0);
                [v, v, v]
            }
            _ => [
                self.sample(pixel, 0),
                self.sample(pixel, 1),
                self.sample(pixel, 2),
            ],
        }
    }

    /// Copy source pixels into the hole pixels of a target region
    ///
    /// `source` and `target` are uncropped patch regions of equal size; the
    /// target is cropped to the image and each hole pixel receives the source
    /// pixel at the same relative position. Valid target pixels are left
    /// untouched. Returns the number of pixels written.
    pub fn copy_into_holes(&mut self, source: &Region, target: &Region, mask: &Mask) -> usize {
        let offset = [
            source.corner[0] - target.corner[0],
            source.corner[1] - target.corner[1],
        ];
        let channels = self.channels();
        let mut written = 0;
        for [row, col] in mask.holes_in(target) {
            let src_row = row as i64 + offset[0] as i64;
            let src_col = col as i64 + offset[1] as i64;
            if src_row < 0 || src_col < 0 {
                continue;
            }
            let src = [src_row as usize, src_col as usize];
            if src[0] >= self.rows() || src[1] >= self.cols() {
                continue;
            }
            for channel in 0..channels {
                let value = self.sample(src, channel);
                if let Some(sample) = self.data.get_mut([row, col, channel]) {
                    *sample = value;
                }
            }
            written += 1;
        }
        written
    }
}
