//! Fill-order priorities
//!
//! Every boundary pixel gets a priority; the pixel with the highest one is
//! filled next. The classic priority is the product of a confidence term
//! (how much trusted information surrounds the pixel) and a data term (how
//! strongly an isophote hits the fill front there).

use ndarray::Array2;
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::io::configuration::MAX_PIXEL_DIFFERENCE;
use crate::math::vector::dot;
use crate::spatial::{Mask, Region};

/// How priorities are derived from the per-pixel terms
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PriorityStrategy {
    /// Confidence term times data term
    #[default]
    Criminisi,
    /// Confidence term only
    Confidence,
    /// User supplied priorities on a `[0, 255]` scale
    ///
    /// Boundary pixels with a non-zero value get `1 + value / 255` and thus
    /// always win over computed priorities; the rest fall back to
    /// [`PriorityStrategy::Criminisi`].
    Manual(Array2<f64>),
}

/// Rule for choosing among boundary pixels with equal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lowest row-major coordinate wins
    #[default]
    FirstRowMajor,
    /// Highest row-major coordinate wins
    LastRowMajor,
}

/// Value written into the confidence map of freshly filled pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidenceUpdate {
    /// Priority of the pixel that triggered the fill
    #[default]
    Priority,
    /// Confidence term of the pixel that triggered the fill
    ConfidenceTerm,
}

/// Per-pixel terms computed for one boundary pixel
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelTerms {
    pixel: [usize; 2],
    confidence: f64,
    data: f64,
    priority: f64,
}

/// Confidence map plus the priority images recomputed each iteration
#[derive(Debug, Clone)]
pub struct PriorityComputer {
    radius: usize,
    strategy: PriorityStrategy,
    confidence_map: Array2<f64>,
    confidence_image: Array2<f64>,
    data_image: Array2<f64>,
    priority_image: Array2<f64>,
}

impl PriorityComputer {
    /// Start with confidence 1 on valid pixels and 0 on holes
    pub fn new(mask: &Mask, radius: usize, strategy: PriorityStrategy) -> Self {
        let dim = mask.dim();
        Self {
            radius,
            strategy,
            confidence_map: mask.validity_indicator(),
            confidence_image: Array2::zeros(dim),
            data_image: Array2::zeros(dim),
            priority_image: Array2::zeros(dim),
        }
    }

    /// Sum of the confidence over valid patch pixels divided by the patch area
    ///
    /// The patch is cropped to the image but the area is always the full
    /// `(2r + 1)^2`, so pixels near the image edge are penalized.
    pub fn confidence_term(&self, pixel: [usize; 2], mask: &Mask) -> f64 {
        let side = 2 * self.radius + 1;
        let area = (side * side) as f64;
        let region = Region::centered(pixel, self.radius).crop(&mask.full_region());
        let sum: f64 = region
            .indices()
            .filter(|&p| mask.is_valid(p))
            .map(|p| self.confidence_map.get(p).copied().unwrap_or(0.0))
            .sum();
        finite_or_zero(sum / area).clamp(0.0, 1.0)
    }

    /// Normalized strength of the isophote along the front normal
    pub fn data_term(
        pixel: [usize; 2],
        isophotes: &Array2<[f64; 2]>,
        normals: &Array2<[f64; 2]>,
    ) -> f64 {
        let isophote = isophotes.get(pixel).copied().unwrap_or([0.0; 2]);
        let normal = normals.get(pixel).copied().unwrap_or([0.0; 2]);
        finite_or_zero(dot(isophote, normal).abs() / MAX_PIXEL_DIFFERENCE).clamp(0.0, 1.0)
    }

    fn terms_for(
        &self,
        pixel: [usize; 2],
        mask: &Mask,
        isophotes: &Array2<[f64; 2]>,
        normals: &Array2<[f64; 2]>,
    ) -> PixelTerms {
        let confidence = self.confidence_term(pixel, mask);
        let data = Self::data_term(pixel, isophotes, normals);
        let priority = match &self.strategy {
            PriorityStrategy::Criminisi => confidence * data,
            PriorityStrategy::Confidence => confidence,
            PriorityStrategy::Manual(manual) => {
                let value = manual.get(pixel).copied().unwrap_or(0.0);
                if value > 0.0 {
                    1.0 + value / MAX_PIXEL_DIFFERENCE
                } else {
                    confidence * data
                }
            }
        };
        PixelTerms {
            pixel,
            confidence,
            data,
            priority: finite_or_zero(priority),
        }
    }

    /// Recompute the confidence, data and priority images on the boundary
    ///
    /// Entries off the boundary are reset to zero.
    pub fn compute_all(
        &mut self,
        boundary: &[[usize; 2]],
        mask: &Mask,
        isophotes: &Array2<[f64; 2]>,
        normals: &Array2<[f64; 2]>,
    ) {
        let terms: Vec<PixelTerms> = boundary
            .par_iter()
            .map(|&pixel| self.terms_for(pixel, mask, isophotes, normals))
            .collect();

        self.confidence_image.fill(0.0);
        self.data_image.fill(0.0);
        self.priority_image.fill(0.0);
        for term in terms {
            set(&mut self.confidence_image, term.pixel, term.confidence);
            set(&mut self.data_image, term.pixel, term.data);
            set(&mut self.priority_image, term.pixel, term.priority);
        }
    }

    /// Boundary pixel with the highest priority, `None` for an empty boundary
    pub fn highest_priority(
        &self,
        boundary: &[[usize; 2]],
        tie_break: TieBreak,
    ) -> Option<[usize; 2]> {
        let mut best: Option<([usize; 2], f64)> = None;
        for &pixel in boundary {
            let priority = self.priority(pixel);
            let replace = match best {
                None => true,
                Some((_, current)) => match tie_break {
                    TieBreak::FirstRowMajor => priority > current,
                    TieBreak::LastRowMajor => priority >= current,
                },
            };
            if replace {
                best = Some((pixel, priority));
            }
        }
        best.map(|(pixel, _)| pixel)
    }

    /// Write `value` into the confidence map for the hole pixels of `region`
    ///
    /// Must run before the mask update so the pixels are still holes.
    pub fn update_confidences(&mut self, mask: &Mask, region: &Region, value: f64) {
        let value = finite_or_zero(value).clamp(0.0, 1.0);
        for pixel in mask.holes_in(region) {
            set(&mut self.confidence_map, pixel, value);
        }
    }

    /// Value used by [`Self::update_confidences`] for the chosen rule
    pub fn confidence_update_value(&self, pixel: [usize; 2], rule: ConfidenceUpdate) -> f64 {
        match rule {
            ConfidenceUpdate::Priority => self.priority(pixel),
            ConfidenceUpdate::ConfidenceTerm => self.confidence_at(pixel),
        }
    }

    /// Priority computed in the last [`Self::compute_all`] call
    pub fn priority(&self, pixel: [usize; 2]) -> f64 {
        self.priority_image.get(pixel).copied().unwrap_or(0.0)
    }

    /// Confidence term computed in the last [`Self::compute_all`] call
    pub fn confidence_at(&self, pixel: [usize; 2]) -> f64 {
        self.confidence_image.get(pixel).copied().unwrap_or(0.0)
    }

    /// Patch radius used for the confidence term
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// Active strategy
    pub const fn strategy(&self) -> &PriorityStrategy {
        &self.strategy
    }

    /// Persistent confidence of every pixel
    pub const fn confidence_map(&self) -> &Array2<f64> {
        &self.confidence_map
    }

    /// Confidence terms of the current boundary
    pub const fn confidence_image(&self) -> &Array2<f64> {
        &self.confidence_image
    }

    /// Data terms of the current boundary
    pub const fn data_image(&self) -> &Array2<f64> {
        &self.data_image
    }

    /// Priorities of the current boundary
    pub const fn priority_image(&self) -> &Array2<f64> {
        &self.priority_image
    }
}

fn set(image: &mut Array2<f64>, pixel: [usize; 2], value: f64) {
    if let Some(entry) = image.get_mut(pixel) {
        *entry = value;
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
