//! Pixel channel domains and the alpha channel augmenter
//!
//! Rasters are `(rows, cols, channels)` arrays. A raster's samples are either
//! 8-bit integers in `[0, 255]` or floats in `[0, 1]`; the [`Channel`] trait
//! abstracts over both so that the same extraction and compositing code
//! serves either domain.

use ndarray::{Array3, ArrayView3, Axis, s};
use num_traits::Zero;

use crate::io::error::{Result, invalid_source};

/// Raster stored as `(rows, cols, channels)`
pub type Raster<T> = Array3<T>;

/// Number of channels in a raster carrying coverage
pub const RGBA_CHANNELS: usize = 4;

/// Index of the coverage channel in a 4-channel raster
pub const ALPHA: usize = 3;

/// Sample type of a raster channel
pub trait Channel: Copy + PartialEq + Zero + Send + Sync + std::fmt::Debug + 'static {
    /// Maximum representable coverage, meaning fully opaque
    const OPAQUE: Self;

    /// Map the sample to the unit interval
    fn to_unit(self) -> f32;

    /// Map a unit-interval value back into this domain, clamping out-of-range input
    fn from_unit(value: f32) -> Self;
}

impl Channel for u8 {
    const OPAQUE: Self = Self::MAX;

    fn to_unit(self) -> f32 {
        f32::from(self) / 255.0
    }

    fn from_unit(value: f32) -> Self {
        (value.clamp(0.0, 1.0) * 255.0).round() as Self
    }
}

impl Channel for f32 {
    const OPAQUE: Self = 1.0;

    fn to_unit(self) -> f32 {
        self
    }

    fn from_unit(value: f32) -> Self {
        value.clamp(0.0, 1.0)
    }
}

/// Convert a color raster into a 4-channel raster that is opaque everywhere
///
/// The first three channels are copied unchanged; any channels beyond the
/// third are dropped.
///
/// # Errors
///
/// Returns `InvalidSourceData` if the input has fewer than three channels.
pub fn with_alpha<T: Channel>(image: ArrayView3<'_, T>) -> Result<Raster<T>> {
    let (rows, cols, channels) = image.dim();
    if channels < 3 {
        return Err(invalid_source(&format!(
            "expected at least 3 color channels, found {channels}"
        )));
    }

    let mut augmented = Array3::from_elem((rows, cols, RGBA_CHANNELS), T::OPAQUE);
    augmented
        .slice_mut(s![.., .., ..3])
        .assign(&image.slice(s![.., .., ..3]));
    Ok(augmented)
}

/// Coverage of every pixel, as a `(rows, cols)` view of the alpha channel
pub fn coverage<T: Channel>(image: &Raster<T>) -> Option<ndarray::ArrayView2<'_, T>> {
    (image.len_of(Axis(2)) == RGBA_CHANNELS).then(|| image.index_axis(Axis(2), ALPHA))
}
