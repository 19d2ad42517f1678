//! Mathematical utilities for clustering

/// sRGB to CIELab conversion and perceptual distances
pub mod color;
