//! Axis-aligned rectangular regions addressing parts of an image
//!
//! Regions use (row, col) ordering throughout. The corner is signed so that a
//! patch centred near the image edge can be described before it is cropped;
//! iteration helpers only make sense once a region has been cropped to the
//! image bounds.

use std::fmt;
use std::ops::Range;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    /// Top-left corner (row, col), possibly outside the image
    pub corner: [i32; 2],
    /// Extent (rows, cols)
    pub size: [usize; 2],
}

impl Region {
    /// Create a region from a corner and a size
    pub const fn new(corner: [i32; 2], size: [usize; 2]) -> Self {
        Self { corner, size }
    }

    /// Region covering a whole `rows` x `cols` image
    pub const fn full(rows: usize, cols: usize) -> Self {
        Self {
            corner: [0, 0],
            size: [rows, cols],
        }
    }

    /// Square region of side `2 * radius + 1` centred on `center`
    pub const fn centered(center: [usize; 2], radius: usize) -> Self {
        let side = 2 * radius + 1;
        Self {
            corner: [
                center[0] as i32 - radius as i32,
                center[1] as i32 - radius as i32,
            ],
            size: [side, side],
        }
    }

    /// True when the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }

    /// Number of pixels covered by the region
    pub const fn number_of_pixels(&self) -> usize {
        self.size[0] * self.size[1]
    }

    /// Exclusive end corner (row, col)
    pub const fn end(&self) -> [i64; 2] {
        [
            self.corner[0] as i64 + self.size[0] as i64,
            self.corner[1] as i64 + self.size[1] as i64,
        ]
    }

    /// Intersection of this region with `bounds`
    ///
    /// Returns an empty region (size zero) when they do not overlap.
    #[must_use]
    pub fn crop(&self, bounds: &Self) -> Self {
        let end = self.end();
        let bounds_end = bounds.end();
        let axis_span = |start: i32, bounds_start: i32, stop: i64, bounds_stop: i64| {
            let from = start.max(bounds_start);
            let to = stop.min(bounds_stop);
            let len = if to > from as i64 {
                (to - from as i64) as usize
            } else {
                0
            };
            (from, len)
        };
        let (row, rows) = axis_span(self.corner[0], bounds.corner[0], end[0], bounds_end[0]);
        let (col, cols) = axis_span(self.corner[1], bounds.corner[1], end[1], bounds_end[1]);
        let size = if rows == 0 || cols == 0 {
            [0, 0]
        } else {
            [rows, cols]
        };
        Self {
            corner: [row, col],
            size,
        }
    }

    /// True when the region lies entirely within `bounds`
    pub const fn is_inside(&self, bounds: &Self) -> bool {
        let end = self.end();
        let bounds_end = bounds.end();
        self.corner[0] >= bounds.corner[0]
            && self.corner[1] >= bounds.corner[1]
            && end[0] <= bounds_end[0]
            && end[1] <= bounds_end[1]
    }

    /// True when the pixel lies within the region
    pub const fn contains(&self, pixel: [usize; 2]) -> bool {
        let end = self.end();
        let row = pixel[0] as i64;
        let col = pixel[1] as i64;
        row >= self.corner[0] as i64
            && col >= self.corner[1] as i64
            && row < end[0]
            && col < end[1]
    }

    /// True when the two regions share at least one pixel
    pub fn intersects(&self, other: &Self) -> bool {
        !self.crop(other).is_empty()
    }

    /// Grow the region by `amount` pixels on every side
    #[must_use]
    pub const fn expand(&self, amount: usize) -> Self {
        Self {
            corner: [
                self.corner[0] - amount as i32,
                self.corner[1] - amount as i32,
            ],
            size: [self.size[0] + 2 * amount, self.size[1] + 2 * amount],
        }
    }

    /// Shift the region by a (row, col) offset
    #[must_use]
    pub const fn translate(&self, offset: [i32; 2]) -> Self {
        Self {
            corner: [self.corner[0] + offset[0], self.corner[1] + offset[1]],
            size: self.size,
        }
    }

    /// Row index range, clamped at zero
    pub fn rows(&self) -> Range<usize> {
        let start = self.corner[0].max(0) as usize;
        let end = self.end()[0].max(0) as usize;
        start..end.max(start)
    }

    /// Column index range, clamped at zero
    pub fn cols(&self) -> Range<usize> {
        let start = self.corner[1].max(0) as usize;
        let end = self.end()[1].max(0) as usize;
        start..end.max(start)
    }

    /// All pixels of the region in row-major order
    pub fn indices(&self) -> impl Iterator<Item = [usize; 2]> + use<> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| [row, col]))
    }

    /// Pixels on the outer ring of the region in row-major order
    pub fn ring_indices(&self) -> Vec<[usize; 2]> {
        let rows = self.rows();
        let cols = self.cols();
        if rows.is_empty() || cols.is_empty() {
            return Vec::new();
        }
        let last_row = rows.end - 1;
        let last_col = cols.end - 1;
        self.indices()
            .filter(|&[row, col]| {
                row == rows.start || row == last_row || col == cols.start || col == last_col
            })
            .collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] {}x{}",
            self.corner[0], self.corner[1], self.size[0], self.size[1]
        )
    }
}
