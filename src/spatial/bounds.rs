//! Tight bounding boxes around foreground pixels
//!
//! A pixel is background when every one of its channels is zero. Masked
//! patches zero all four channels outside their cluster, so the box found
//! here is exactly the extent of the cluster.

use ndarray::{Array3, ArrayView3, Axis, s};

use crate::io::error::{CollageError, Result};
use crate::spatial::raster::Channel;

/// Axis-aligned box with inclusive bounds on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// First row containing foreground
    pub min_row: usize,
    /// Last row containing foreground
    pub max_row: usize,
    /// First column containing foreground
    pub min_col: usize,
    /// Last column containing foreground
    pub max_col: usize,
}

// First and last index along `axis` whose lane holds a non-zero sample
fn occupied_span<T: Channel>(image: &ArrayView3<'_, T>, axis: Axis) -> Option<(usize, usize)> {
    let mut occupied = image
        .axis_iter(axis)
        .enumerate()
        .filter(|(_, lane)| lane.iter().any(|value| !value.is_zero()))
        .map(|(index, _)| index);

    let first = occupied.next()?;
    let last = occupied.last().unwrap_or(first);
    Some((first, last))
}

/// Find the minimal rectangle containing every non-background pixel
///
/// Works for any channel count. Returns `None` when the image is entirely
/// background.
pub fn content_bounds<T: Channel>(image: ArrayView3<'_, T>) -> Option<BoundingBox> {
    let (min_row, max_row) = occupied_span(&image, Axis(0))?;
    let (min_col, max_col) = occupied_span(&image, Axis(1))?;

    Some(BoundingBox {
        min_row,
        max_row,
        min_col,
        max_col,
    })
}

/// Crop an image to the bounding box of its foreground
///
/// # Errors
///
/// Returns `EmptyMask` if no pixel of the image has a non-zero channel.
pub fn crop_to_content<T: Channel>(image: ArrayView3<'_, T>) -> Result<Array3<T>> {
    let (rows, cols, _) = image.dim();
    let bbox = content_bounds(image.view()).ok_or(CollageError::EmptyMask {
        dimensions: (rows, cols),
    })?;

    Ok(image
        .slice(s![bbox.min_row..=bbox.max_row, bbox.min_col..=bbox.max_col, ..])
        .to_owned())
}
