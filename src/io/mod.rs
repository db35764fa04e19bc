//! Input/output operations and error handling

/// Command-line interface and batch file processing
pub mod cli;
/// Algorithm constants and runtime configuration defaults
pub mod configuration;
/// Error types and context management
pub mod error;
/// PNG loading and export
pub mod image;
/// Progress bars for batch processing
pub mod progress;
/// GIF capture of the fill progression
pub mod visualization;
