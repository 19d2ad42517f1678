//! Superpixel patch extraction and randomized collage assembly
//!
//! Source photos are segmented into compact clusters, each cluster is cut
//! out as a transparency-masked patch, and patches are dropped at random
//! onto a fixed canvas until every pixel is covered. Finished canvases are
//! saved and a new one starts.

/// Patch extraction, compositing, placement and the assembly loop
pub mod algorithm;
/// Superpixel segmentation and label maps
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Color space conversion for clustering
pub mod math;
/// Rasters, patches, the canvas and its coverage index
pub mod spatial;

pub use io::error::{CollageError, Result};
