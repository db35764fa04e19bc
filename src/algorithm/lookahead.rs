//! Forward look over the best ranked pairs
//!
//! A greedy choice can be locally good but leave a target that nothing in
//! the image matches. The forward look trial-fills each of the leading
//! pairs, picks the following target the same way the controller would,
//! ranks that target with the same strategy and adds the follow-up's best
//! score to the pair's own.

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::algorithm::cache::RegionSampleCache;
use crate::algorithm::clustering::ColorClusters;
use crate::algorithm::executor::FillState;
use crate::algorithm::selection::{RankingContext, RankingParams, rank_candidates};
use crate::algorithm::texture::TextureGradients;
use crate::analysis::boundary::BoundaryTracker;
use crate::analysis::isophotes::masked_blur_raster;
use crate::analysis::priority::{ConfidenceUpdate, TieBreak};
use crate::spatial::PatchPair;

/// Parameters of the forward look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadParams {
    /// Number of leading ranked pairs to evaluate
    pub max_forward_look_patches: usize,
    /// Blur variance used to refresh the trial front
    pub blur_variance: f64,
    /// Tie rule for the trial target choice
    pub tie_break: TieBreak,
    /// Confidence rule applied by the trial fill
    pub confidence_update: ConfidenceUpdate,
    /// Ranking used for the follow-up target
    pub ranking: RankingParams,
    /// Compare the follow-up on a blurred copy of the trial image
    pub compare_blurred: bool,
    /// Source window for the follow-up match
    pub search_radius: Option<usize>,
}

/// Colour and texture models of the real run, cloned for each trial
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialModels<'a> {
    /// Colour clusters, when the strategy uses them
    pub clusters: Option<&'a ColorClusters>,
    /// Texture gradients, when the strategy uses them
    pub texture: Option<&'a TextureGradients>,
}

/// Combined score of `pair` and the best fill that would follow it
///
/// Both parts are ranking totals of the configured strategy. The follow-up
/// is zero when the trial completes the fill, and the result is `None` when
/// the pair cannot be applied or the trial leaves no usable target or
/// source.
pub fn evaluate(
    state: &FillState,
    models: TrialModels<'_>,
    pair: &PatchPair,
    params: &LookaheadParams,
) -> Option<f64> {
    let mut trial = state.clone();
    trial.apply(pair, params.confidence_update).ok()?;
    if !trial.mask.has_holes() {
        return Some(pair.scores.total);
    }

    let region = pair.target.region;
    let mut cache = RegionSampleCache::new();
    let clusters = models.clusters.map(|clusters| {
        let mut clusters = clusters.clone();
        clusters.update_membership(&trial.output, &region);
        clusters
    });
    let texture = models.texture.map(|texture| {
        let mut texture = texture.clone();
        texture.update(&trial.output, &trial.mask, &region, &mut cache);
        texture
    });

    let (rows, cols) = trial.mask.dim();
    let mut tracker = BoundaryTracker::new(rows, cols, params.blur_variance);
    let next = trial.select_target(&mut tracker, params.tie_break).ok()?;
    let sources = trial.index.candidates_for(&next, params.search_radius);

    let blurred = params
        .compare_blurred
        .then(|| masked_blur_raster(&trial.output, &trial.mask, params.blur_variance));
    let context = RankingContext {
        raster: blurred.as_ref().unwrap_or(&trial.output),
        mask: &trial.mask,
        isophotes: tracker.isophotes(),
        clusters: clusters.as_ref(),
        texture: texture.as_ref(),
    };
    let ranking = RankingParams {
        top_patches: 1,
        ..params.ranking
    };
    let follow_up = rank_candidates(&context, &mut cache, &next, &sources, &ranking)
        .into_iter()
        .next()?;
    Some(pair.scores.total + follow_up.scores.total)
}

/// Pick the pair to copy from an already ranked list
///
/// With at most one pair to look at the first ranked pair is returned
/// unchanged. Otherwise the lowest combined score wins and ties go to the
/// better ranked pair. Returns `None` only for an empty list.
pub fn select_best(
    state: &FillState,
    models: TrialModels<'_>,
    ranked: &[PatchPair],
    params: &LookaheadParams,
) -> Option<PatchPair> {
    let count = params.max_forward_look_patches.min(ranked.len());
    if count <= 1 {
        return ranked.first().copied();
    }

    let leaders = ranked.get(..count)?;
    let totals: Vec<Option<f64>> = leaders
        .par_iter()
        .map(|pair| evaluate(state, models, pair, params))
        .collect();

    let mut best: Option<(PatchPair, f64)> = None;
    for (pair, total) in leaders.iter().zip(totals) {
        let Some(total) = total else {
            continue;
        };
        if best.is_none_or(|(_, current)| total < current) {
            let mut scored = *pair;
            scored.scores.lookahead_score = Some(total);
            best = Some((scored, total));
        }
    }
    best.map(|(pair, _)| pair).or_else(|| ranked.first().copied())
}
