//! Spatial data structures for rasters, patches and the canvas
//!
//! This module contains spatial-related functionality including:
//! - Channel domains and alpha augmentation
//! - Bounding-box reduction of masked rasters
//! - Patches, the patch pool and the collage canvas

/// Tight bounding boxes around foreground pixels
pub mod bounds;
/// Collage canvas with first-writer-wins pixel writes
pub mod canvas;
/// Sparse index of uncovered canvas pixels
pub mod coverage;
/// Masked patches and the shared patch pool
pub mod patch;
/// Channel domains and the alpha channel augmenter
pub mod raster;

pub use canvas::Canvas;
pub use patch::{Patch, PatchPool};
pub use raster::{Channel, Raster};
