pub mod patch;
pub mod raster;
pub mod region;
