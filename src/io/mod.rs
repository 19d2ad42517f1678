//! Input/output collaborators around the extraction and assembly engines

/// Command-line parsing and pipeline orchestration
pub mod cli;
/// Pipeline constants and defaults
pub mod configuration;
/// External viewer invocation
pub mod display;
/// Error types shared by every module
pub mod error;
/// Image discovery, decoding, resizing and export
pub mod image;
/// Collage sinks that persist finished canvases
pub mod output;
/// Progress bars for extraction and assembly
pub mod progress;
