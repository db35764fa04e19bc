//! Algorithm constants and runtime configuration defaults

/// Half side length of the square patches that are compared and copied
pub const DEFAULT_PATCH_RADIUS: usize = 4;

// Smoothing applied before isophote and normal estimation
/// Variance of the Gaussian blur used for isophotes and normals
pub const DEFAULT_BLUR_VARIANCE: f64 = 2.0;
/// Radius of the Gaussian kernel in pixels
pub const GAUSSIAN_KERNEL_RADIUS: usize = 20;

/// Largest difference between two samples on the `[0, 255]` scale
pub const MAX_PIXEL_DIFFERENCE: f64 = 255.0;

// Candidate ranking
/// Number of ranked source patches kept per iteration
pub const DEFAULT_TOP_PATCHES: usize = 10;
/// Number of best pixel-difference candidates re-ranked by histogram distance
pub const DEFAULT_HISTOGRAM_CANDIDATES: usize = 100;
/// Bins per channel in gradient magnitude histograms
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;
/// Number of colour clusters (histogram bins) for colour histograms
pub const DEFAULT_COLOR_BINS: usize = 16;
/// Upper bound on k-means refinement passes
pub const DEFAULT_KMEANS_ITERATIONS: usize = 10;
/// Number of ranked pairs evaluated by the forward look
pub const DEFAULT_FORWARD_LOOK_PATCHES: usize = 1;

// Safety limit for runaway runs
/// Default iteration cap used by the command line front end
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

// Progress bar display settings
/// Number of images that keep a progress bar of their own
pub const MAX_VISIBLE_FILE_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

// Default values for configurable parameters
/// Fixed seed for reproducible clustering
pub const DEFAULT_SEED: u64 = 42;

// Mask and companion file settings
/// Suffix of the mask file accompanying an input image
pub const MASK_SUFFIX: &str = "_mask";
/// Suffix of the optional manual priority image
pub const PRIORITY_SUFFIX: &str = "_priority";
/// Mask luminance above which a pixel is treated as a hole
pub const MASK_HOLE_THRESHOLD: u8 = 127;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_inpainted";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
