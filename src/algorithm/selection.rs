//! Candidate scoring and ranking
//!
//! Every strategy starts from the pixel-difference ranking; the histogram
//! based strategies then re-rank the best part of that list.

use ndarray::Array2;
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::algorithm::cache::RegionSampleCache;
use crate::algorithm::clustering::ColorClusters;
use crate::algorithm::difference::{
    DifferenceMetric, average_patch_difference, boundary_continuity, introduced_energy,
};
use crate::algorithm::texture::TextureGradients;
use crate::io::configuration::{
    DEFAULT_HISTOGRAM_CANDIDATES, DEFAULT_TOP_PATCHES, MAX_PIXEL_DIFFERENCE,
};
use crate::spatial::{Mask, Patch, PatchPair, Raster};

/// Weights of the terms combined by [`RankingStrategy::Composite`]
///
/// Every term is scaled to roughly `[0, 1]` before weighting. Histogram and
/// introduced energy terms are only evaluated when their weight is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeWeights {
    /// Weight of the average pixel difference
    pub pixel_difference: f64,
    /// Weight of the pixel difference along the target's ring
    pub boundary_pixel_difference: f64,
    /// Weight of the isophote angle difference along the ring
    pub boundary_isophote_angle: f64,
    /// Weight of the isophote strength difference along the ring
    pub boundary_isophote_strength: f64,
    /// Weight of the colour histogram distance
    pub color_histogram: f64,
    /// Weight of the texture histogram distance
    pub texture_histogram: f64,
    /// Weight of the gradient change introduced around the target
    pub introduced_energy: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            pixel_difference: 1.0,
            boundary_pixel_difference: 1.0,
            boundary_isophote_angle: 1.0,
            boundary_isophote_strength: 1.0,
            color_histogram: 0.0,
            texture_histogram: 0.0,
            introduced_energy: 0.0,
        }
    }
}

/// How candidate source patches are ordered
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RankingStrategy {
    /// Average pixel difference only
    #[default]
    PixelDifference,
    /// Re-rank the best pixel matches by colour-cluster histogram distance
    ColorHistogram,
    /// Re-rank the best pixel matches by gradient histogram distance
    TextureGradientHistogram,
    /// Re-rank the best pixel matches by a weighted sum of criteria
    Composite(CompositeWeights),
}

impl RankingStrategy {
    /// True when colour clusters must be built for this strategy
    pub fn needs_color_clusters(&self) -> bool {
        match self {
            Self::ColorHistogram => true,
            Self::Composite(weights) => weights.color_histogram > 0.0,
            Self::PixelDifference | Self::TextureGradientHistogram => false,
        }
    }

    /// True when texture gradients must be maintained for this strategy
    pub fn needs_texture_gradients(&self) -> bool {
        match self {
            Self::TextureGradientHistogram => true,
            Self::Composite(weights) => weights.texture_histogram > 0.0,
            Self::PixelDifference | Self::ColorHistogram => false,
        }
    }
}

/// Parameters controlling one ranking pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingParams {
    /// Ordering strategy
    pub strategy: RankingStrategy,
    /// Per-pixel distance
    pub metric: DifferenceMetric,
    /// Number of ranked pairs returned
    pub top_patches: usize,
    /// Number of pixel-difference leaders re-ranked by the other criteria
    pub histogram_candidates: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            strategy: RankingStrategy::default(),
            metric: DifferenceMetric::default(),
            top_patches: DEFAULT_TOP_PATCHES,
            histogram_candidates: DEFAULT_HISTOGRAM_CANDIDATES,
        }
    }
}

/// Read-only view of the state a ranking pass works on
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// Current working image
    pub raster: &'a Raster,
    /// Current mask
    pub mask: &'a Mask,
    /// Current isophote field
    pub isophotes: &'a Array2<[f64; 2]>,
    /// Colour clusters, when the strategy uses them
    pub clusters: Option<&'a ColorClusters>,
    /// Texture gradients, when the strategy uses them
    pub texture: Option<&'a TextureGradients>,
}

/// Squared norm of the largest one-sided gradient change, on both axes
const ENERGY_SCALE: f64 = 2.0 * MAX_PIXEL_DIFFERENCE * MAX_PIXEL_DIFFERENCE;

/// Largest per-pixel distance the metric can produce
fn max_pixel_distance(metric: DifferenceMetric, channels: usize) -> f64 {
    let channels = channels.max(1) as f64;
    match metric {
        DifferenceMetric::SumSquared => channels * MAX_PIXEL_DIFFERENCE * MAX_PIXEL_DIFFERENCE,
        DifferenceMetric::SumAbsolute => channels * MAX_PIXEL_DIFFERENCE,
    }
}

/// Score every source against `target` by average pixel difference
///
/// Scoring runs in parallel; the stable sort keeps scan order among equal
/// scores, so identical sources rank in the order they were indexed.
pub fn score_by_pixel_difference(
    raster: &Raster,
    mask: &Mask,
    target: &Patch,
    sources: &[Patch],
    metric: DifferenceMetric,
) -> Vec<PatchPair> {
    let mut pairs: Vec<PatchPair> = sources
        .par_iter()
        .map(|source| {
            let difference = average_patch_difference(raster, mask, target, source, metric);
            let mut pair = PatchPair::new(*source, *target);
            pair.scores.average_difference = difference.average;
            pair.scores.compared_pixels = difference.compared_pixels;
            pair.scores.total = difference.average;
            pair
        })
        .collect();
    pairs.sort_by(|a, b| a.scores.total.total_cmp(&b.scores.total));
    pairs
}

/// Best source for `target` by pixel difference alone
pub fn best_by_pixel_difference(
    raster: &Raster,
    mask: &Mask,
    target: &Patch,
    sources: &[Patch],
    metric: DifferenceMetric,
) -> Option<PatchPair> {
    score_by_pixel_difference(raster, mask, target, sources, metric)
        .into_iter()
        .next()
}

/// Rank `sources` for `target` and keep the best `top_patches`
pub fn rank_candidates(
    context: &RankingContext<'_>,
    cache: &mut RegionSampleCache,
    target: &Patch,
    sources: &[Patch],
    params: &RankingParams,
) -> Vec<PatchPair> {
    let mut ranked = score_by_pixel_difference(
        context.raster,
        context.mask,
        target,
        sources,
        params.metric,
    );

    if params.strategy != RankingStrategy::PixelDifference {
        let head_len = params.histogram_candidates.max(1).min(ranked.len());
        let tail = ranked.split_off(head_len);
        rerank(context, cache, target, &mut ranked, params);
        ranked.extend(tail);
    }

    ranked.truncate(params.top_patches.max(1));
    ranked
}

fn rerank(
    context: &RankingContext<'_>,
    cache: &mut RegionSampleCache,
    target: &Patch,
    head: &mut [PatchPair],
    params: &RankingParams,
) {
    let use_color = params.strategy.needs_color_clusters();
    let use_texture = params.strategy.needs_texture_gradients();

    if use_color {
        if let Some(clusters) = context.clusters {
            let color: Vec<f64> = head
                .par_iter()
                .map(|pair| clusters.difference(context.mask, target, &pair.source))
                .collect();
            for (pair, value) in head.iter_mut().zip(color) {
                pair.scores.color_histogram_difference = Some(value);
            }
        }
    }

    if use_texture {
        if let Some(texture) = context.texture {
            let sources: Vec<Patch> = head.iter().map(|pair| pair.source).collect();
            let differences = texture.differences(context.mask, target, &sources, cache);
            for (pair, value) in head.iter_mut().zip(differences) {
                pair.scores.texture_histogram_difference = Some(value);
            }
        }
    }

    match params.strategy {
        RankingStrategy::PixelDifference => {}
        RankingStrategy::ColorHistogram => {
            for pair in head.iter_mut() {
                pair.scores.total = pair.scores.color_histogram_difference.unwrap_or(0.0);
            }
        }
        RankingStrategy::TextureGradientHistogram => {
            for pair in head.iter_mut() {
                pair.scores.total = pair.scores.texture_histogram_difference.unwrap_or(0.0);
            }
        }
        RankingStrategy::Composite(weights) => {
            composite_scores(context, head, params.metric, &weights);
        }
    }

    head.sort_by(|a, b| a.scores.total.total_cmp(&b.scores.total));
}

fn composite_scores(
    context: &RankingContext<'_>,
    head: &mut [PatchPair],
    metric: DifferenceMetric,
    weights: &CompositeWeights,
) {
    let channels = context.raster.channels().max(1);
    let pixel_scale = max_pixel_distance(metric, channels);

    let continuity: Vec<_> = head
        .par_iter()
        .map(|pair| {
            boundary_continuity(
                context.raster,
                context.mask,
                context.isophotes,
                &pair.target,
                &pair.source,
                metric,
            )
        })
        .collect();

    let energies: Vec<Option<f64>> = if weights.introduced_energy > 0.0 {
        let luminance = context.raster.luminance();
        head.par_iter()
            .map(|pair| {
                Some(introduced_energy(&luminance, context.mask, &pair.target, &pair.source).total())
            })
            .collect()
    } else {
        vec![None; head.len()]
    };

    for ((pair, ring), energy) in head.iter_mut().zip(continuity).zip(energies) {
        let scores = &mut pair.scores;
        let mut total = weights.pixel_difference * scores.average_difference / pixel_scale;
        if let Some(ring) = ring {
            scores.boundary_pixel_difference = Some(ring.pixel_difference);
            scores.boundary_isophote_angle_difference = Some(ring.isophote_angle_difference);
            scores.boundary_isophote_strength_difference =
                Some(ring.isophote_strength_difference);
            total += weights.boundary_pixel_difference * ring.pixel_difference / pixel_scale;
            total += weights.boundary_isophote_angle * ring.isophote_angle_difference;
            total += weights.boundary_isophote_strength * ring.isophote_strength_difference;
        }
        // L1 distance of normalized histograms is at most 2 per histogram
        if let Some(color) = scores.color_histogram_difference {
            total += weights.color_histogram * color / 2.0;
        }
        if let Some(texture) = scores.texture_histogram_difference {
            total += weights.texture_histogram * texture / (2.0 * channels as f64);
        }
        if let Some(energy) = energy {
            scores.introduced_energy = Some(energy);
            total += weights.introduced_energy * energy / ENERGY_SCALE;
        }
        scores.total = total;
    }
}
