//! Raster model consumed by the inpainting core
//!
//! This module contains the spatial building blocks:
//! - Rectangular regions with cropping
//! - Hole/valid masks
//! - Multi-channel rasters
//! - Patches and source/target patch pairs

/// Hole/valid pixel classification
pub mod mask;
/// Square patches and patch pairs
pub mod patch;
/// Multi-channel pixel storage
pub mod raster;
/// Axis-aligned regions and cropping
pub mod region;

pub use mask::{Mask, MaskState};
pub use patch::{Patch, PatchPair};
pub use raster::Raster;
pub use region::Region;
