//! Command-line interface for batch inpainting of PNG files

use crate::algorithm::difference::DifferenceMetric;
use crate::algorithm::executor::{InpaintConfig, Inpainter};
use crate::algorithm::selection::{CompositeWeights, RankingStrategy};
use crate::analysis::priority::{ConfidenceUpdate, PriorityStrategy, TieBreak};
use crate::io::configuration::{
    DEFAULT_BLUR_VARIANCE, DEFAULT_COLOR_BINS, DEFAULT_FORWARD_LOOK_PATCHES,
    DEFAULT_HISTOGRAM_BINS, DEFAULT_MAX_ITERATIONS, DEFAULT_PATCH_RADIUS, DEFAULT_SEED,
    DEFAULT_TOP_PATCHES, MASK_SUFFIX, OUTPUT_SUFFIX, PRIORITY_SUFFIX,
};
use crate::io::error::{Result, path_error};
use crate::io::image::{
    export_gray_png, export_raster_png, export_scalar_png, load_mask, load_priority_image,
    load_raster,
};
use crate::io::progress::ProgressManager;
use crate::math::vector::norm;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Candidate ranking strategy selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RankingArg {
    /// Average pixel difference
    Pixel,
    /// Colour-cluster histogram distance
    Color,
    /// Gradient-magnitude histogram distance
    Texture,
    /// Weighted pixel, boundary and histogram criteria
    Composite,
}

impl From<RankingArg> for RankingStrategy {
    fn from(arg: RankingArg) -> Self {
        match arg {
            RankingArg::Pixel => Self::PixelDifference,
            RankingArg::Color => Self::ColorHistogram,
            RankingArg::Texture => Self::TextureGradientHistogram,
            RankingArg::Composite => Self::Composite(CompositeWeights::default()),
        }
    }
}

/// Pixel difference metric selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Sum of squared differences
    Squared,
    /// Sum of absolute differences
    Absolute,
}

impl From<MetricArg> for DifferenceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Squared => Self::SumSquared,
            MetricArg::Absolute => Self::SumAbsolute,
        }
    }
}

/// Tie rule selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TieBreakArg {
    /// First pixel in row-major order
    First,
    /// Last pixel in row-major order
    Last,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => Self::FirstRowMajor,
            TieBreakArg::Last => Self::LastRowMajor,
        }
    }
}

/// Confidence rule selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfidenceArg {
    /// Use the priority of the filled pixel
    Priority,
    /// Use the confidence term of the filled pixel
    Confidence,
}

impl From<ConfidenceArg> for ConfidenceUpdate {
    fn from(arg: ConfidenceArg) -> Self {
        match arg {
            ConfidenceArg::Priority => Self::Priority,
            ConfidenceArg::Confidence => Self::ConfidenceTerm,
        }
    }
}

#[derive(Parser)]
#[command(name = "greedyfill")]
#[command(
    author,
    version,
    about = "Fill masked holes in images with greedy exemplar-based inpainting"
)]
/// Command-line arguments for the inpainting tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Mask PNG for a single input file (defaults to <input>_mask.png)
    #[arg(long, value_name = "PATH")]
    pub mask: Option<PathBuf>,

    /// Patch radius in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_RADIUS)]
    pub radius: usize,

    /// Maximum iterations before stopping
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Candidate ranking strategy
    #[arg(long, value_enum, default_value_t = RankingArg::Pixel)]
    pub ranking: RankingArg,

    /// Weight of the introduced gradient energy in composite ranking
    #[arg(long, default_value_t = 0.0)]
    pub energy_weight: f64,

    /// Pixel difference metric
    #[arg(long, value_enum, default_value_t = MetricArg::Squared)]
    pub metric: MetricArg,

    /// Compare patches on a blurred copy of the image
    #[arg(long)]
    pub compare_blurred: bool,

    /// Number of ranked candidates kept per iteration
    #[arg(long, default_value_t = DEFAULT_TOP_PATCHES)]
    pub top_patches: usize,

    /// Number of ranked candidates evaluated with a trial fill
    #[arg(long, default_value_t = DEFAULT_FORWARD_LOOK_PATCHES)]
    pub forward_look: usize,

    /// Bins per channel for texture histograms
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub histogram_bins: usize,

    /// Number of colour clusters for colour histograms
    #[arg(long, default_value_t = DEFAULT_COLOR_BINS)]
    pub color_bins: usize,

    /// Only search sources within this distance of the target
    #[arg(long)]
    pub search_radius: Option<usize>,

    /// Rule for equal priorities
    #[arg(long, value_enum, default_value_t = TieBreakArg::First)]
    pub tie_break: TieBreakArg,

    /// Value assigned to the confidence of filled pixels
    #[arg(long, value_enum, default_value_t = ConfidenceArg::Priority)]
    pub confidence_update: ConfidenceArg,

    /// Use manual priorities if available (looks for <input>_priority.png)
    #[arg(short, long)]
    pub priority_image: bool,

    /// Variance of the smoothing applied before isophote estimation
    #[arg(long, default_value_t = DEFAULT_BLUR_VARIANCE)]
    pub blur_variance: f64,

    /// Random seed for reproducible colour clustering
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Enable visualization output as animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Export confidence, priority, data, boundary and isophote images
    #[arg(short, long)]
    pub debug_images: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log verbosity (repeatable)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> log::Level {
        if self.quiet {
            return log::Level::Error;
        }
        match self.verbose {
            0 => log::Level::Warn,
            1 => log::Level::Info,
            2 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }

    /// Ranking strategy with the command line composite weights applied
    pub fn ranking_strategy(&self) -> RankingStrategy {
        match RankingStrategy::from(self.ranking) {
            RankingStrategy::Composite(weights) => RankingStrategy::Composite(CompositeWeights {
                introduced_energy: self.energy_weight,
                ..weights
            }),
            other => other,
        }
    }

    /// Inpainting configuration for the given manual priorities
    pub fn inpaint_config(&self, manual_priority: Option<ndarray::Array2<f64>>) -> InpaintConfig {
        InpaintConfig {
            patch_radius: self.radius,
            blur_variance: self.blur_variance,
            priority: manual_priority.map_or(PriorityStrategy::Criminisi, PriorityStrategy::Manual),
            tie_break: self.tie_break.into(),
            confidence_update: self.confidence_update.into(),
            ranking: self.ranking_strategy(),
            metric: self.metric.into(),
            compare_blurred: self.compare_blurred,
            top_patches: self.top_patches,
            histogram_bins: self.histogram_bins,
            color_bins: self.color_bins,
            max_forward_look_patches: self.forward_look,
            search_radius: self.search_radius,
            max_iterations: Some(self.iterations),
            seed: self.seed,
            ..InpaintConfig::default()
        }
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Input images found at the target, excluding masks and outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a PNG file nor a directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(path_error(
                    &self.cli.target,
                    "Target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_png(&path) && is_input_image(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(path_error(
                &self.cli.target,
                "Target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        let mask_path = match (&self.cli.mask, self.cli.target.is_file()) {
            (Some(mask), true) => mask.clone(),
            _ => Self::get_mask_path(input_path),
        };
        if !mask_path.exists() {
            return Err(path_error(&mask_path, "Mask file not found"));
        }

        let raster = load_raster(input_path)?;
        let mask = load_mask(&mask_path)?;

        let manual_priority = if self.cli.priority_image {
            let priority_path = Self::get_priority_path(input_path);
            if priority_path.exists() {
                Some(load_priority_image(&priority_path)?)
            } else {
                warn!(
                    "No priority image found at: {} (continuing with computed priorities)",
                    priority_path.display()
                );
                None
            }
        } else {
            None
        };

        let hole_pixels = mask.hole_count();
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, hole_pixels);
        }

        let mut inpainter = Inpainter::new(raster, mask, self.cli.inpaint_config(manual_priority))?;
        inpainter.initialize()?;

        if self.cli.visualize {
            inpainter.enable_visualization();
        }

        for _ in 0..self.cli.iterations {
            let should_continue = inpainter.iterate()?;
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_filled(index, hole_pixels - inpainter.mask().hole_count());
            }
            if !should_continue {
                break;
            }
        }

        if inpainter.has_more_to_inpaint() {
            warn!(
                "{}: stopped after {} iterations with {} hole pixels left",
                input_path.display(),
                inpainter.number_of_completed_iterations(),
                inpainter.mask().hole_count()
            );
        }

        export_raster_png(inpainter.output(), &output_path)?;

        if self.cli.visualize && inpainter.number_of_completed_iterations() > 0 {
            let viz_path = Self::get_sibling_path(input_path, "_visualization.gif");
            inpainter.export_visualization(
                viz_path
                    .to_str()
                    .ok_or_else(|| path_error(&viz_path, "Invalid visualization path"))?,
            )?;
        }

        if self.cli.debug_images {
            Self::export_debug_images(&inpainter, input_path)?;
        }

        info!(
            "{}: {} iterations in {:.2?}",
            input_path.display(),
            inpainter.number_of_completed_iterations(),
            start_time.elapsed()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    fn export_debug_images(inpainter: &Inpainter, input_path: &Path) -> Result<()> {
        export_scalar_png(
            inpainter.confidence_map(),
            &Self::get_sibling_path(input_path, "_confidence.png"),
        )?;
        export_scalar_png(
            inpainter.priority_image(),
            &Self::get_sibling_path(input_path, "_priorities.png"),
        )?;
        export_scalar_png(
            inpainter.data_image(),
            &Self::get_sibling_path(input_path, "_data.png"),
        )?;
        export_gray_png(
            inpainter.boundary_image(),
            &Self::get_sibling_path(input_path, "_boundary.png"),
        )?;
        export_scalar_png(
            &inpainter.isophotes().mapv(norm),
            &Self::get_sibling_path(input_path, "_isophotes.png"),
        )
    }

    fn get_sibling_path(input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{}", stem.to_string_lossy(), suffix);

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }

    /// Output path for an input image (`foo.png` -> `foo_inpainted.png`)
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let extension = input_path.extension().unwrap_or_default();
        Self::get_sibling_path(
            input_path,
            &format!("{OUTPUT_SUFFIX}.{}", extension.to_string_lossy()),
        )
    }

    /// Mask path for an input image (`foo.png` -> `foo_mask.png`)
    pub fn get_mask_path(input_path: &Path) -> PathBuf {
        Self::get_sibling_path(input_path, &format!("{MASK_SUFFIX}.png"))
    }

    /// Manual priority path for an input image (`foo.png` -> `foo_priority.png`)
    pub fn get_priority_path(input_path: &Path) -> PathBuf {
        Self::get_sibling_path(input_path, &format!("{PRIORITY_SUFFIX}.png"))
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

/// True unless the file is a companion (mask, priority) or a generated output
pub fn is_input_image(path: &Path) -> bool {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    ![
        MASK_SUFFIX,
        PRIORITY_SUFFIX,
        OUTPUT_SUFFIX,
        "_confidence",
        "_priorities",
        "_data",
        "_boundary",
        "_isophotes",
    ]
    .iter()
    .any(|suffix| stem.ends_with(suffix))
}
