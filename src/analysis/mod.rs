//! Superpixel segmentation of source images into labeled clusters

/// Connectivity enforcement and fragment merging for label maps
pub mod connectivity;
/// Per-pixel cluster label maps
pub mod labels;
/// SLIC superpixel clustering
pub mod segmentation;

pub use labels::LabelMap;
pub use segmentation::{SegmentationConfig, SlicSegmenter};
