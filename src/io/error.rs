//! Error types and context management for inpainting operations

use std::fmt;
use std::path::PathBuf;

use crate::spatial::region::Region;

/// Main error type for all inpainting operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load an image or mask from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Image and mask (or auxiliary image) sizes disagree
    DimensionMismatch {
        /// Dimensions of the image (rows, cols)
        image: (usize, usize),
        /// Dimensions of the mismatched companion (rows, cols)
        other: (usize, usize),
    },

    /// A region lies outside the image where cropping is not meaningful
    InvalidRegion {
        /// The rejected region
        region: Region,
        /// The full image region
        bounds: Region,
    },

    /// No fully valid source patch exists for the chosen target
    ///
    /// The greedy algorithm has no fallback, so this stops the run.
    NoValidCandidate {
        /// Iteration during which the search failed
        iteration: usize,
        /// Centre of the target patch (row, col)
        target: [usize; 2],
    },

    /// Hole pixels remain but the fill front is empty
    InconsistentMaskState {
        /// Iteration during which the inconsistency was detected
        iteration: usize,
        /// Number of hole pixels still present
        hole_pixels: usize,
    },

    /// Operation is not allowed in the current controller state
    InvalidState {
        /// Name of the attempted operation
        operation: &'static str,
        /// Description of the current state
        state: String,
    },

    /// Algorithm parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::DimensionMismatch { image, other } => {
                write!(
                    f,
                    "Dimension mismatch: image is {}x{} but companion is {}x{}",
                    image.0, image.1, other.0, other.1
                )
            }
            Self::InvalidRegion { region, bounds } => {
                write!(f, "Region {region} lies outside image bounds {bounds}")
            }
            Self::NoValidCandidate { iteration, target } => {
                write!(
                    f,
                    "No valid source patch for target ({}, {}) at iteration {iteration}",
                    target[0], target[1]
                )
            }
            Self::InconsistentMaskState {
                iteration,
                hole_pixels,
            } => {
                write!(
                    f,
                    "Empty fill front with {hole_pixels} hole pixels remaining at iteration {iteration}"
                )
            }
            Self::InvalidState { operation, state } => {
                write!(f, "Cannot {operation} while inpainter is {state}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for algorithm results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Stamps the current iteration into fatal loop errors
pub trait WithContext<T> {
    /// Record `iteration` in `NoValidCandidate` and `InconsistentMaskState`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the iteration applied
    fn with_iteration(self, iteration: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AlgorithmError>,
{
    fn with_iteration(self, iteration: usize) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            if let AlgorithmError::NoValidCandidate { iteration: at, .. }
            | AlgorithmError::InconsistentMaskState { iteration: at, .. } = &mut error
            {
                *at = iteration;
            }
            error
        })
    }
}

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an error for a path that cannot be used as input or output
pub fn path_error(path: &std::path::Path, reason: &str) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter: "path",
        value: path.display().to_string(),
        reason: reason.to_string(),
    }
}
