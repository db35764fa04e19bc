//! Pixel based patch comparisons

use ndarray::Array2;

use crate::analysis::boundary::is_boundary_pixel;
use crate::analysis::isophotes::{DerivativeAxis, masked_derivative_at};
use crate::io::configuration::MAX_PIXEL_DIFFERENCE;
use crate::math::vector::{angle_between, dot, norm};
use crate::spatial::{Mask, Patch, Raster};

/// Per-sample distance accumulated over the compared pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifferenceMetric {
    /// Sum of squared channel differences
    #[default]
    SumSquared,
    /// Sum of absolute channel differences
    SumAbsolute,
}

impl DifferenceMetric {
    /// Distance between two pixels given as channel samples
    pub fn pixel_distance<'a, A, B>(self, a: A, b: B) -> f64
    where
        A: IntoIterator<Item = &'a f64>,
        B: IntoIterator<Item = &'a f64>,
    {
        a.into_iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x - y;
                match self {
                    Self::SumSquared => d * d,
                    Self::SumAbsolute => d.abs(),
                }
            })
            .sum()
    }
}

/// Average difference between a target and a source patch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PatchDifference {
    /// Accumulated distance divided by the number of compared pixels
    pub average: f64,
    /// Number of valid target pixels that were compared
    pub compared_pixels: usize,
}

fn raster_distance(
    raster: &Raster,
    metric: DifferenceMetric,
    a: [usize; 2],
    b: [usize; 2],
) -> Option<f64> {
    let first = raster.pixel(a)?;
    let second = raster.pixel(b)?;
    Some(metric.pixel_distance(first.iter(), second.iter()))
}

fn shifted(pixel: [usize; 2], offset: [i32; 2]) -> Option<[usize; 2]> {
    let row = pixel[0] as i64 + offset[0] as i64;
    let col = pixel[1] as i64 + offset[1] as i64;
    (row >= 0 && col >= 0).then_some([row as usize, col as usize])
}

/// Compare the valid pixels of `target` with the matching `source` pixels
///
/// The target is cropped to the image first. Nothing compared yields an
/// average of zero.
pub fn average_patch_difference(
    raster: &Raster,
    mask: &Mask,
    target: &Patch,
    source: &Patch,
    metric: DifferenceMetric,
) -> PatchDifference {
    let offset = target.offset_to(source);
    let mut total = 0.0;
    let mut compared = 0;
    for pixel in target.region.crop(&mask.full_region()).indices() {
        if !mask.is_valid(pixel) {
            continue;
        }
        let Some(other) = shifted(pixel, offset) else {
            continue;
        };
        if let Some(distance) = raster_distance(raster, metric, pixel, other) {
            total += distance;
            compared += 1;
        }
    }
    PatchDifference {
        average: if compared > 0 {
            total / compared as f64
        } else {
            0.0
        },
        compared_pixels: compared,
    }
}

/// How well a source patch continues the image across the target's border
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundaryContinuity {
    /// Average pixel distance along the ring
    pub pixel_difference: f64,
    /// Average isophote angle difference, as a fraction of pi
    pub isophote_angle_difference: f64,
    /// Average isophote magnitude difference on the `[0, 1]` scale
    pub isophote_strength_difference: f64,
    /// Number of ring pixels compared
    pub compared_pixels: usize,
}

/// Compare the outer ring of the (cropped) target patch with the source
///
/// Only valid ring pixels are used. Returns `None` when no ring pixel is
/// valid.
pub fn boundary_continuity(
    raster: &Raster,
    mask: &Mask,
    isophotes: &Array2<[f64; 2]>,
    target: &Patch,
    source: &Patch,
    metric: DifferenceMetric,
) -> Option<BoundaryContinuity> {
    let offset = target.offset_to(source);
    let mut result = BoundaryContinuity::default();
    for pixel in target.region.crop(&mask.full_region()).ring_indices() {
        if !mask.is_valid(pixel) {
            continue;
        }
        let Some(other) = shifted(pixel, offset) else {
            continue;
        };
        let Some(distance) = raster_distance(raster, metric, pixel, other) else {
            continue;
        };
        let here = isophotes.get(pixel).copied().unwrap_or([0.0; 2]);
        let there = isophotes.get(other).copied().unwrap_or([0.0; 2]);
        result.pixel_difference += distance;
        result.isophote_angle_difference += angle_between(here, there) / std::f64::consts::PI;
        result.isophote_strength_difference +=
            (norm(here) - norm(there)).abs() / MAX_PIXEL_DIFFERENCE;
        result.compared_pixels += 1;
    }
    if result.compared_pixels == 0 {
        return None;
    }
    let count = result.compared_pixels as f64;
    result.pixel_difference /= count;
    result.isophote_angle_difference /= count;
    result.isophote_strength_difference /= count;
    Some(result)
}

/// Gradient change a copy would introduce around the target
///
/// Both terms are averages of the squared change of the masked luminance
/// gradient, taken before and after the source is copied into the target's
/// holes. A copy that continues the surrounding image changes little.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntroducedEnergy {
    /// Change on the valid pixels of the target's outer ring
    pub patch_boundary: f64,
    /// Change on the fill front inside the target
    pub mask_boundary: f64,
}

impl IntroducedEnergy {
    /// Sum of both terms
    pub fn total(&self) -> f64 {
        self.patch_boundary + self.mask_boundary
    }
}

fn gradient_at(image: &Array2<f64>, mask: &Mask, pixel: [usize; 2]) -> [f64; 2] {
    [
        masked_derivative_at(image, mask, pixel, DerivativeAxis::Row),
        masked_derivative_at(image, mask, pixel, DerivativeAxis::Col),
    ]
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count > 0 { sum / count as f64 } else { 0.0 }
}

/// Energy introduced by copying `source` into the holes of `target`
///
/// Works on a window of `luminance` one pixel wider than the cropped
/// target, which is all the derivatives of the measured pixels read.
pub fn introduced_energy(
    luminance: &Array2<f64>,
    mask: &Mask,
    target: &Patch,
    source: &Patch,
) -> IntroducedEnergy {
    let bounds = mask.full_region();
    let filled = target.region.crop(&bounds);
    if filled.is_empty() {
        return IntroducedEnergy::default();
    }
    let window = filled.expand(1).crop(&bounds);
    let origin = [window.rows().start, window.cols().start];
    let shape = (window.size[0], window.size[1]);
    let offset = target.offset_to(source);
    let global = |(r, c): (usize, usize)| [origin[0] + r, origin[1] + c];
    let sample = |pixel: [usize; 2]| luminance.get(pixel).copied().unwrap_or(0.0);

    let before = Array2::from_shape_fn(shape, |rc| sample(global(rc)));
    let after = Array2::from_shape_fn(shape, |rc| {
        let pixel = global(rc);
        if filled.contains(pixel) && mask.is_hole(pixel) {
            shifted(pixel, offset).map_or(0.0, sample)
        } else {
            sample(pixel)
        }
    });
    let mask_before = Mask::from_holes(&Array2::from_shape_fn(shape, |rc| mask.is_hole(global(rc))));
    let mask_after = Mask::from_holes(&Array2::from_shape_fn(shape, |rc| {
        let pixel = global(rc);
        mask.is_hole(pixel) && !filled.contains(pixel)
    }));

    let change = |pixel: [usize; 2]| {
        let local = [pixel[0] - origin[0], pixel[1] - origin[1]];
        let old = gradient_at(&before, &mask_before, local);
        let new = gradient_at(&after, &mask_after, local);
        let delta = [new[0] - old[0], new[1] - old[1]];
        dot(delta, delta)
    };

    IntroducedEnergy {
        patch_boundary: mean(
            filled
                .ring_indices()
                .into_iter()
                .filter(|&p| mask.is_valid(p))
                .map(change),
        ),
        mask_boundary: mean(
            filled
                .indices()
                .filter(|&p| is_boundary_pixel(mask, p))
                .map(change),
        ),
    }
}
