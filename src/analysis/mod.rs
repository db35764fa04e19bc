//! Analysis of the fill front: where to fill next

/// Boundary (fill front) detection, normals and mask updates
pub mod boundary;
/// Masked smoothing, derivatives and isophotes
pub mod isophotes;
/// Confidence, data and priority terms
pub mod priority;
