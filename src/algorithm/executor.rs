use std::fmt;

use log::{debug, trace};
use ndarray::Array2;

use crate::{
    algorithm::cache::RegionSampleCache,
    algorithm::candidates::SourcePatchIndex,
    algorithm::clustering::ColorClusters,
    algorithm::difference::DifferenceMetric,
    algorithm::lookahead::{LookaheadParams, TrialModels, select_best},
    algorithm::selection::{RankingContext, RankingParams, RankingStrategy, rank_candidates},
    algorithm::texture::TextureGradients,
    analysis::boundary::{BoundaryTracker, update_mask},
    analysis::isophotes::masked_blur_raster,
    analysis::priority::{ConfidenceUpdate, PriorityComputer, PriorityStrategy, TieBreak},
    io::configuration::{
        DEFAULT_BLUR_VARIANCE, DEFAULT_COLOR_BINS, DEFAULT_FORWARD_LOOK_PATCHES,
        DEFAULT_HISTOGRAM_BINS, DEFAULT_HISTOGRAM_CANDIDATES, DEFAULT_KMEANS_ITERATIONS,
        DEFAULT_PATCH_RADIUS, DEFAULT_SEED, DEFAULT_TOP_PATCHES, GIF_FRAME_DELAY_MS,
    },
    io::error::{AlgorithmError, Result, WithContext, invalid_parameter},
    io::visualization::VisualizationCapture,
    spatial::{Mask, Patch, PatchPair, Raster, Region},
};

/// Algorithm parameters controlling fill order and patch selection
#[derive(Clone, Debug, PartialEq)]
pub struct InpaintConfig {
    /// Half side length of compared and copied patches
    pub patch_radius: usize,
    /// Variance of the Gaussian used before isophote and normal estimation
    pub blur_variance: f64,
    /// How boundary priorities are computed
    pub priority: PriorityStrategy,
    /// How equal priorities are resolved
    pub tie_break: TieBreak,
    /// Value given to the confidence of freshly filled pixels
    pub confidence_update: ConfidenceUpdate,
    /// How candidate source patches are ordered
    pub ranking: RankingStrategy,
    /// Per-pixel distance used by every pixel comparison
    pub metric: DifferenceMetric,
    /// Rank candidates on a blurred copy of the working image
    pub compare_blurred: bool,
    /// Number of ranked candidates kept per iteration
    pub top_patches: usize,
    /// Number of pixel-difference leaders re-ranked by histogram strategies
    pub histogram_candidates: usize,
    /// Bins per channel for gradient histograms
    pub histogram_bins: usize,
    /// Number of colour clusters
    pub color_bins: usize,
    /// Upper bound on k-means passes
    pub kmeans_iterations: usize,
    /// Number of ranked pairs evaluated with a trial fill
    pub max_forward_look_patches: usize,
    /// Restrict sources to this window half size around the target
    pub search_radius: Option<usize>,
    /// Stop [`Inpainter::inpaint`] after this many iterations
    pub max_iterations: Option<usize>,
    /// Seed for colour clustering
    pub seed: u64,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            patch_radius: DEFAULT_PATCH_RADIUS,
            blur_variance: DEFAULT_BLUR_VARIANCE,
            priority: PriorityStrategy::default(),
            tie_break: TieBreak::default(),
            confidence_update: ConfidenceUpdate::default(),
            ranking: RankingStrategy::default(),
            metric: DifferenceMetric::default(),
            compare_blurred: false,
            top_patches: DEFAULT_TOP_PATCHES,
            histogram_candidates: DEFAULT_HISTOGRAM_CANDIDATES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            color_bins: DEFAULT_COLOR_BINS,
            kmeans_iterations: DEFAULT_KMEANS_ITERATIONS,
            max_forward_look_patches: DEFAULT_FORWARD_LOOK_PATCHES,
            search_radius: None,
            max_iterations: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl InpaintConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero radius or count, or a negative
    /// or non-finite blur variance.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("patch_radius", self.patch_radius),
            ("top_patches", self.top_patches),
            ("histogram_candidates", self.histogram_candidates),
            ("histogram_bins", self.histogram_bins),
            ("color_bins", self.color_bins),
            ("max_forward_look_patches", self.max_forward_look_patches),
        ];
        for (parameter, value) in positive {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be at least 1"));
            }
        }
        if !self.blur_variance.is_finite() || self.blur_variance < 0.0 {
            return Err(invalid_parameter(
                "blur_variance",
                &self.blur_variance,
                &"must be finite and non-negative",
            ));
        }
        if self.search_radius == Some(0) {
            return Err(invalid_parameter(
                "search_radius",
                &0,
                &"must be at least 1 when given",
            ));
        }
        Ok(())
    }

    /// Ranking parameters derived from this configuration
    pub const fn ranking_params(&self) -> RankingParams {
        RankingParams {
            strategy: self.ranking,
            metric: self.metric,
            top_patches: self.top_patches,
            histogram_candidates: self.histogram_candidates,
        }
    }

    /// Forward-look parameters derived from this configuration
    pub const fn lookahead_params(&self) -> LookaheadParams {
        LookaheadParams {
            max_forward_look_patches: self.max_forward_look_patches,
            blur_variance: self.blur_variance,
            tie_break: self.tie_break,
            confidence_update: self.confidence_update,
            ranking: self.ranking_params(),
            compare_blurred: self.compare_blurred,
            search_radius: self.search_radius,
        }
    }
}

/// Lifecycle of an [`Inpainter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InpaintState {
    /// Created, [`Inpainter::initialize`] not yet called
    Uninitialized,
    /// Initialized, no iteration run yet
    Ready,
    /// At least one iteration ran and holes remain
    Iterating,
    /// No hole remains
    Done,
}

impl fmt::Display for InpaintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Iterating => "iterating",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Mutable state touched by one fill step
///
/// The controller owns one of these; the forward look clones it to run
/// trial fills without affecting the real run.
#[derive(Clone, Debug)]
pub struct FillState {
    /// Working image
    pub output: Raster,
    /// Current mask
    pub mask: Mask,
    /// Confidence map and priority images
    pub priorities: PriorityComputer,
    /// Usable source patches
    pub index: SourcePatchIndex,
}

impl FillState {
    /// Refresh the front and priorities, then pick the next target patch
    ///
    /// # Errors
    ///
    /// Returns `InconsistentMaskState` when holes remain but the front is
    /// empty. The error carries iteration 0; callers stamp their own.
    pub fn select_target(
        &mut self,
        tracker: &mut BoundaryTracker,
        tie_break: TieBreak,
    ) -> Result<Patch> {
        tracker.refresh(&self.output, &self.mask);
        self.priorities.compute_all(
            tracker.boundary(),
            &self.mask,
            tracker.isophotes(),
            tracker.normals(),
        );
        let pixel = self
            .priorities
            .highest_priority(tracker.boundary(), tie_break)
            .ok_or_else(|| AlgorithmError::InconsistentMaskState {
                iteration: 0,
                hole_pixels: self.mask.hole_count(),
            })?;
        Ok(Patch::new(pixel, self.priorities.radius()))
    }

    /// Copy the pair's source into the target holes and update the state
    ///
    /// Confidences are written before the mask update so they land on the
    /// pixels that were holes. Returns the number of filled pixels.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` when the source patch is not fully inside the
    /// image. The state is left untouched in that case.
    pub fn apply(&mut self, pair: &PatchPair, rule: ConfidenceUpdate) -> Result<usize> {
        let bounds = self.mask.full_region();
        if !pair.source.region.is_inside(&bounds) {
            return Err(AlgorithmError::InvalidRegion {
                region: pair.source.region,
                bounds,
            });
        }
        let region = pair.target.region;
        let value = self
            .priorities
            .confidence_update_value(pair.target.center, rule);
        self.priorities
            .update_confidences(&self.mask, &region, value);
        self.output
            .copy_into_holes(&pair.source.region, &region, &self.mask);
        let filled = update_mask(&mut self.mask, &region);
        self.index.add_new_in_region(&self.mask, &region);
        Ok(filled)
    }
}

/// Greedy exemplar-based inpainting controller
///
/// Each iteration fills the hole pixels of the highest-priority patch on the
/// fill front with the best matching fully known patch of the same image.
pub struct Inpainter {
    config: InpaintConfig,
    state: InpaintState,
    original: Raster,
    original_mask: Mask,
    fill: FillState,
    tracker: BoundaryTracker,
    clusters: Option<ColorClusters>,
    texture: Option<TextureGradients>,
    cache: RegionSampleCache,
    used_pairs: Vec<PatchPair>,
    last_candidates: Vec<PatchPair>,
    iteration: usize,
    /// Optional visualization capture
    pub visualization: Option<VisualizationCapture>,
}

impl Inpainter {
    /// Create an inpainter for `image` where `mask` marks the holes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The mask or a manual priority image does not match the image size
    pub fn new(image: Raster, mask: Mask, config: InpaintConfig) -> Result<Self> {
        config.validate()?;
        if image.dim() != mask.dim() {
            return Err(AlgorithmError::DimensionMismatch {
                image: image.dim(),
                other: mask.dim(),
            });
        }
        if let PriorityStrategy::Manual(manual) = &config.priority {
            if manual.dim() != image.dim() {
                return Err(AlgorithmError::DimensionMismatch {
                    image: image.dim(),
                    other: manual.dim(),
                });
            }
        }

        let (rows, cols) = image.dim();
        let fill = FillState {
            output: image.clone(),
            mask: mask.clone(),
            priorities: PriorityComputer::new(&mask, config.patch_radius, config.priority.clone()),
            index: SourcePatchIndex::empty(rows, cols, config.patch_radius),
        };

        Ok(Self {
            tracker: BoundaryTracker::new(rows, cols, config.blur_variance),
            config,
            state: InpaintState::Uninitialized,
            original: image,
            original_mask: mask,
            fill,
            clusters: None,
            texture: None,
            cache: RegionSampleCache::new(),
            used_pairs: Vec::new(),
            last_candidates: Vec::new(),
            iteration: 0,
            visualization: None,
        })
    }

    /// Prepare every data structure for the first iteration
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when called more than once.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != InpaintState::Uninitialized {
            return Err(AlgorithmError::InvalidState {
                operation: "initialize",
                state: self.state.to_string(),
            });
        }

        let radius = self.config.patch_radius;
        self.fill = FillState {
            output: self.original.clone(),
            mask: self.original_mask.clone(),
            priorities: PriorityComputer::new(
                &self.original_mask,
                radius,
                self.config.priority.clone(),
            ),
            index: SourcePatchIndex::build(&self.original_mask, radius),
        };
        self.tracker.refresh(&self.fill.output, &self.fill.mask);
        self.cache.clear();

        self.clusters = self.config.ranking.needs_color_clusters().then(|| {
            ColorClusters::new(
                &self.fill.output,
                &self.fill.mask,
                self.config.color_bins,
                self.config.kmeans_iterations,
                self.config.seed,
            )
        });
        self.texture = self.config.ranking.needs_texture_gradients().then(|| {
            TextureGradients::new(
                &self.fill.output,
                &self.fill.mask,
                self.config.histogram_bins,
            )
        });

        debug!(
            "initialized {}x{} image: {} hole pixels, {} source patches",
            self.original.rows(),
            self.original.cols(),
            self.fill.mask.hole_count(),
            self.fill.index.len()
        );

        self.state = if self.fill.mask.has_holes() {
            InpaintState::Ready
        } else {
            InpaintState::Done
        };
        Ok(())
    }

    /// Run a single fill step
    ///
    /// Returns `Ok(false)` when there is nothing left to fill.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The inpainter was not initialized
    /// - The fill front is empty while holes remain
    /// - No source patch is available for the chosen target
    pub fn iterate(&mut self) -> Result<bool> {
        match self.state {
            InpaintState::Uninitialized => {
                return Err(AlgorithmError::InvalidState {
                    operation: "iterate",
                    state: self.state.to_string(),
                });
            }
            InpaintState::Done => return Ok(false),
            InpaintState::Ready | InpaintState::Iterating => {}
        }

        if !self.fill.mask.has_holes() {
            self.state = InpaintState::Done;
            return Ok(false);
        }

        let iteration = self.iteration + 1;

        // Phase 1: Choose where to fill
        let target = self
            .fill
            .select_target(&mut self.tracker, self.config.tie_break)
            .with_iteration(iteration)?;

        // Phase 2: Rank candidate sources
        let sources = self
            .fill
            .index
            .candidates_for(&target, self.config.search_radius);
        let blurred = self.config.compare_blurred.then(|| {
            masked_blur_raster(&self.fill.output, &self.fill.mask, self.config.blur_variance)
        });
        let context = RankingContext {
            raster: blurred.as_ref().unwrap_or(&self.fill.output),
            mask: &self.fill.mask,
            isophotes: self.tracker.isophotes(),
            clusters: self.clusters.as_ref(),
            texture: self.texture.as_ref(),
        };
        let ranked = rank_candidates(
            &context,
            &mut self.cache,
            &target,
            &sources,
            &self.config.ranking_params(),
        );

        // Phase 3: Pick the pair to copy
        let models = TrialModels {
            clusters: self.clusters.as_ref(),
            texture: self.texture.as_ref(),
        };
        let chosen = select_best(&self.fill, models, &ranked, &self.config.lookahead_params())
            .ok_or(AlgorithmError::NoValidCandidate {
                iteration,
                target: target.center,
            })?;

        // Phase 4: Copy and update
        let filled = self.fill.apply(&chosen, self.config.confidence_update)?;
        let region = chosen.target.region;
        if let Some(clusters) = &mut self.clusters {
            clusters.update_membership(&self.fill.output, &region);
        }
        if let Some(texture) = &mut self.texture {
            texture.update(&self.fill.output, &self.fill.mask, &region, &mut self.cache);
        }
        if let Some(viz) = &mut self.visualization {
            viz.record_fill(&chosen, iteration);
        }

        trace!(
            "iteration {iteration}: target {} <- source {} ({} pixels, score {:.3}, summed difference {:.1})",
            chosen.target,
            chosen.source,
            filled,
            chosen.scores.total,
            chosen.scores.total_difference()
        );

        self.used_pairs.push(chosen);
        self.last_candidates = ranked;
        self.iteration = iteration;
        self.state = if self.fill.mask.has_holes() {
            InpaintState::Iterating
        } else {
            InpaintState::Done
        };
        Ok(true)
    }

    /// Iterate until no hole remains or the iteration cap is reached
    ///
    /// Initializes first when needed. Returns the number of iterations run
    /// by this call.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by [`Self::iterate`].
    pub fn inpaint(&mut self) -> Result<usize> {
        if self.state == InpaintState::Uninitialized {
            self.initialize()?;
        }
        let mut performed = 0;
        while self
            .config
            .max_iterations
            .is_none_or(|cap| performed < cap)
        {
            if !self.iterate()? {
                break;
            }
            performed += 1;
        }
        debug!(
            "inpaint finished after {performed} iterations, {} hole pixels left",
            self.fill.mask.hole_count()
        );
        Ok(performed)
    }

    /// Enable GIF recording of the fill progression
    pub fn enable_visualization(&mut self) {
        self.visualization = Some(VisualizationCapture::new(
            &self.original,
            &self.original_mask,
            self.config.max_iterations.unwrap_or(0),
        ));
    }

    /// Export visualization as GIF if enabled
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Visualization was not enabled
    /// - GIF export fails
    pub fn export_visualization(&self, output_path: &str) -> Result<()> {
        self.visualization.as_ref().map_or_else(
            || {
                Err(AlgorithmError::InvalidParameter {
                    parameter: "visualization",
                    value: "disabled".to_string(),
                    reason: "Visualization was not enabled for this run".to_string(),
                })
            },
            |viz| viz.export_gif(output_path, GIF_FRAME_DELAY_MS),
        )
    }

    /// True while hole pixels remain and no fatal error stopped the run
    pub fn has_more_to_inpaint(&self) -> bool {
        self.state != InpaintState::Done && self.fill.mask.has_holes()
    }

    /// Number of successful iterations so far
    pub const fn number_of_completed_iterations(&self) -> usize {
        self.iteration
    }

    /// Current lifecycle state
    pub const fn state(&self) -> InpaintState {
        self.state
    }

    /// Configuration in use
    pub const fn config(&self) -> &InpaintConfig {
        &self.config
    }

    /// Pairs copied so far, in iteration order
    pub fn used_patch_pairs(&self) -> &[PatchPair] {
        &self.used_pairs
    }

    /// Pair copied in iteration `id` (zero based)
    pub fn used_patch_pair(&self, id: usize) -> Option<&PatchPair> {
        self.used_pairs.get(id)
    }

    /// Ranked candidates of the most recent iteration
    pub fn last_candidates(&self) -> &[PatchPair] {
        &self.last_candidates
    }

    /// Current working image
    pub const fn output(&self) -> &Raster {
        &self.fill.output
    }

    /// Current mask
    pub const fn mask(&self) -> &Mask {
        &self.fill.mask
    }

    /// Image as given to [`Self::new`]
    pub const fn original(&self) -> &Raster {
        &self.original
    }

    /// Mask as given to [`Self::new`]
    pub const fn original_mask(&self) -> &Mask {
        &self.original_mask
    }

    /// Persistent per-pixel confidence
    pub const fn confidence_map(&self) -> &Array2<f64> {
        self.fill.priorities.confidence_map()
    }

    /// Confidence terms of the last computed front
    pub const fn confidence_image(&self) -> &Array2<f64> {
        self.fill.priorities.confidence_image()
    }

    /// Data terms of the last computed front
    pub const fn data_image(&self) -> &Array2<f64> {
        self.fill.priorities.data_image()
    }

    /// Priorities of the last computed front
    pub const fn priority_image(&self) -> &Array2<f64> {
        self.fill.priorities.priority_image()
    }

    /// Last computed fill front
    pub fn boundary(&self) -> &[[usize; 2]] {
        self.tracker.boundary()
    }

    /// Last computed fill front as an 8-bit image
    pub const fn boundary_image(&self) -> &Array2<u8> {
        self.tracker.boundary_image()
    }

    /// Last computed front normals
    pub const fn boundary_normals(&self) -> &Array2<[f64; 2]> {
        self.tracker.normals()
    }

    /// Last computed isophote field
    pub const fn isophotes(&self) -> &Array2<[f64; 2]> {
        self.tracker.isophotes()
    }

    /// Region covering the whole image
    pub fn full_region(&self) -> Region {
        self.original.full_region()
    }

    /// Texture cache statistics
    pub const fn cache_stats(&self) -> crate::algorithm::cache::CacheStats {
        self.cache.stats
    }
}
