//! Mathematical utilities for the algorithm

/// Gaussian kernels for separable smoothing
pub mod gaussian;
/// Fixed-bin histograms and histogram distances
pub mod histogram;
/// Small helpers for 2-vectors (gradients, isophotes, normals)
pub mod vector;
