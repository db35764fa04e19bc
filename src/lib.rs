//! Greedy exemplar-based image inpainting
//!
//! Holes marked by a mask are filled patch by patch. Each iteration picks
//! the point of the fill front with the highest priority and copies in the
//! best matching fully known patch of the same image, so edges and texture
//! propagate into the hole.

#![deny(unsafe_code)]

/// Candidate search, ranking and the iteration controller
pub mod algorithm;
/// Fill-front tracking and priority computation
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for smoothing, histograms and 2-vectors
pub mod math;
/// Regions, masks, rasters and patches
pub mod spatial;

pub use algorithm::executor::{InpaintConfig, InpaintState, Inpainter};
pub use io::error::{AlgorithmError, Result};
