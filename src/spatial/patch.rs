//! Square patches and the source/target pairs built from them

use std::fmt;

use crate::spatial::region::Region;

/// Square neighbourhood of side `2 * radius + 1` around a centre pixel
///
/// A patch only describes a location in the working image; it owns no
/// pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Patch {
    /// Centre pixel (row, col)
    pub center: [usize; 2],
    /// Half side length
    pub radius: usize,
    /// Uncropped region covered by the patch
    pub region: Region,
}

impl Patch {
    /// Patch of the given radius centred on `center`
    pub const fn new(center: [usize; 2], radius: usize) -> Self {
        Self {
            center,
            radius,
            region: Region::centered(center, radius),
        }
    }

    /// Side length in pixels
    pub const fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Number of pixels of the uncropped patch
    pub const fn area(&self) -> usize {
        self.side() * self.side()
    }

    /// Offset (row, col) that maps this patch's pixels onto `other`
    pub const fn offset_to(&self, other: &Self) -> [i32; 2] {
        [
            other.center[0] as i32 - self.center[0] as i32,
            other.center[1] as i32 - self.center[1] as i32,
        ]
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) r={}",
            self.center[0], self.center[1], self.radius
        )
    }
}

/// Scores computed for a source/target pair
///
/// Optional fields stay `None` when the active ranking strategy did not
/// evaluate that criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairScores {
    /// Average per-pixel difference over the valid part of the target
    pub average_difference: f64,
    /// Number of pixels compared for `average_difference`
    pub compared_pixels: usize,
    /// Average pixel difference along the target's outer ring
    pub boundary_pixel_difference: Option<f64>,
    /// Average isophote angle difference along the ring, in `[0, 1]`
    pub boundary_isophote_angle_difference: Option<f64>,
    /// Average isophote strength difference along the ring
    pub boundary_isophote_strength_difference: Option<f64>,
    /// L1 distance between colour-cluster histograms
    pub color_histogram_difference: Option<f64>,
    /// L1 distance between gradient-magnitude histograms
    pub texture_histogram_difference: Option<f64>,
    /// Squared gradient change the copy would cause on the target's edges
    pub introduced_energy: Option<f64>,
    /// Combined score of this pair and the best follow-up fill
    pub lookahead_score: Option<f64>,
    /// Score used for ranking, lower is better
    pub total: f64,
}

impl PairScores {
    /// Summed (not averaged) pixel difference over the compared pixels
    pub fn total_difference(&self) -> f64 {
        self.average_difference * self.compared_pixels as f64
    }
}

/// A source patch proposed (or used) to fill a target patch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchPair {
    /// Fully valid patch the pixels are copied from
    pub source: Patch,
    /// Patch around the pixel being filled
    pub target: Patch,
    /// Scores gathered while ranking
    pub scores: PairScores,
}

impl PatchPair {
    /// Pair with default scores
    pub fn new(source: Patch, target: Patch) -> Self {
        Self {
            source,
            target,
            scores: PairScores::default(),
        }
    }

    /// Offset that maps target pixels onto source pixels
    pub const fn target_to_source_offset(&self) -> [i32; 2] {
        self.target.offset_to(&self.source)
    }
}
