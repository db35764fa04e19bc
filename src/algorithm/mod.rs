/// Memoization of per-region gradient samples
pub mod cache;
/// Index of fully known source patches
pub mod candidates;
/// K-means colour clusters and colour histograms
pub mod clustering;
/// Pixel and boundary-continuity patch comparisons
pub mod difference;
/// Inpainting controller and its configuration
pub mod executor;
/// Trial fills over the leading ranked pairs
pub mod lookahead;
/// Candidate scoring and ranking strategies
pub mod selection;
/// Gradient-magnitude texture histograms
pub mod texture;
