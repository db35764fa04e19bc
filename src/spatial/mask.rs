//! Hole/valid classification of image pixels

use ndarray::Array2;

use crate::spatial::region::Region;

/// Classification of a single mask cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskState {
    /// Unknown content that still has to be synthesized
    Hole,
    /// Known content, either original or already filled
    Valid,
}

/// Per-pixel hole/valid classification aligned with a raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    cells: Array2<MaskState>,
}

impl Mask {
    /// Mask with every pixel valid
    pub fn full_valid(rows: usize, cols: usize) -> Self {
        Self {
            cells: Array2::from_elem((rows, cols), MaskState::Valid),
        }
    }

    /// Build a mask from a boolean hole indicator (`true` = hole)
    pub fn from_holes(holes: &Array2<bool>) -> Self {
        Self {
            cells: holes.mapv(|hole| {
                if hole {
                    MaskState::Hole
                } else {
                    MaskState::Valid
                }
            }),
        }
    }

    /// Mask that is valid everywhere except inside `region`
    pub fn with_hole(rows: usize, cols: usize, region: &Region) -> Self {
        let mut mask = Self::full_valid(rows, cols);
        let cropped = region.crop(&mask.full_region());
        for [row, col] in cropped.indices() {
            if let Some(cell) = mask.cells.get_mut([row, col]) {
                *cell = MaskState::Hole;
            }
        }
        mask
    }

    /// Grid dimensions (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Region covering the whole mask
    pub fn full_region(&self) -> Region {
        Region::full(self.rows(), self.cols())
    }

    /// State of a pixel, `None` outside the grid
    pub fn state(&self, pixel: [usize; 2]) -> Option<MaskState> {
        self.cells.get(pixel).copied()
    }

    /// True for in-bounds hole pixels
    pub fn is_hole(&self, pixel: [usize; 2]) -> bool {
        self.state(pixel) == Some(MaskState::Hole)
    }

    /// True for in-bounds valid pixels
    pub fn is_valid(&self, pixel: [usize; 2]) -> bool {
        self.state(pixel) == Some(MaskState::Valid)
    }

    /// Validity of a signed coordinate, false outside the grid
    pub fn is_valid_signed(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && self.is_valid([row as usize, col as usize])
    }

    /// Number of hole pixels in the whole mask
    pub fn hole_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&state| state == MaskState::Hole)
            .count()
    }

    /// True when at least one hole pixel remains
    pub fn has_holes(&self) -> bool {
        self.cells.iter().any(|&state| state == MaskState::Hole)
    }

    /// True when `region` lies inside the image and contains no hole pixel
    pub fn is_region_valid(&self, region: &Region) -> bool {
        region.is_inside(&self.full_region()) && region.indices().all(|p| self.is_valid(p))
    }

    /// Hole pixels within `region` (cropped to the image), row-major
    pub fn holes_in(&self, region: &Region) -> Vec<[usize; 2]> {
        region
            .crop(&self.full_region())
            .indices()
            .filter(|&p| self.is_hole(p))
            .collect()
    }

    /// Mark every hole pixel in `region` as valid, returning how many changed
    pub fn fill_region(&mut self, region: &Region) -> usize {
        let cropped = region.crop(&self.full_region());
        let mut changed = 0;
        for pixel in cropped.indices() {
            if let Some(cell) = self.cells.get_mut(pixel) {
                if *cell == MaskState::Hole {
                    *cell = MaskState::Valid;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Indicator image with 1.0 on valid pixels and 0.0 on holes
    pub fn validity_indicator(&self) -> Array2<f64> {
        self.cells.mapv(|state| match state {
            MaskState::Valid => 1.0,
            MaskState::Hole => 0.0,
        })
    }

    /// Borrow the underlying cell grid
    pub const fn cells(&self) -> &Array2<MaskState> {
        &self.cells
    }
}
