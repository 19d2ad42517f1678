//! Transparency-masked patches and the pool they are drawn from

use ndarray::s;

use crate::io::error::{Result, invalid_source};
use crate::spatial::raster::{ALPHA, Channel, RGBA_CHANNELS, Raster, coverage};

/// Cropped 4-channel sub-image of one cluster
///
/// Coverage is zero outside the cluster and opaque inside it. The extent is
/// the tightest box around the covered pixels.
#[derive(Debug, Clone)]
pub struct Patch<T> {
    pixels: Raster<T>,
    covered: Vec<[usize; 2]>,
    label: u32,
}

impl<T: Channel> Patch<T> {
    /// Wrap a cropped, masked raster
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if the raster does not have four channels,
    /// has a zero dimension, or covers no pixel at all.
    pub fn new(pixels: Raster<T>, label: u32) -> Result<Self> {
        let (rows, cols, channels) = pixels.dim();
        let Some(alpha) = coverage(&pixels) else {
            return Err(invalid_source(&format!(
                "patch needs {RGBA_CHANNELS} channels, found {channels}"
            )));
        };
        if rows == 0 || cols == 0 {
            return Err(invalid_source(&format!("patch has empty extent {rows}x{cols}")));
        }

        let covered: Vec<[usize; 2]> = alpha
            .indexed_iter()
            .filter(|(_, alpha)| !alpha.is_zero())
            .map(|((row, col), _)| [row, col])
            .collect();

        if covered.is_empty() {
            return Err(invalid_source(&format!(
                "patch for label {label} covers no pixel"
            )));
        }

        Ok(Self {
            pixels,
            covered,
            label,
        })
    }

    /// Patch height
    pub fn rows(&self) -> usize {
        self.pixels.dim().0
    }

    /// Patch width
    pub fn cols(&self) -> usize {
        self.pixels.dim().1
    }

    /// Pixel data as `(rows, cols, 4)`
    pub const fn pixels(&self) -> &Raster<T> {
        &self.pixels
    }

    /// Cluster label this patch was cut from
    pub const fn label(&self) -> u32 {
        self.label
    }

    /// Offsets `[row, col]` of every covered pixel, in raster order
    pub fn covered_offsets(&self) -> &[[usize; 2]] {
        &self.covered
    }

    /// Number of covered pixels
    pub const fn coverage_count(&self) -> usize {
        self.covered.len()
    }

    /// Test whether the pixel at `(row, col)` belongs to the cluster
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.pixels
            .get([row, col, ALPHA])
            .is_some_and(|alpha| !alpha.is_zero())
    }

    /// Geometric center used as the compositing anchor
    pub fn center(&self) -> [usize; 2] {
        [self.rows() / 2, self.cols() / 2]
    }

    /// Test whether the cluster includes its own geometric center
    pub fn covers_center(&self) -> bool {
        let [row, col] = self.center();
        self.covers(row, col)
    }

    /// Read the four channels at `(row, col)`
    pub fn pixel(&self, row: usize, col: usize) -> Option<[T; RGBA_CHANNELS]> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let mut values = [T::zero(); RGBA_CHANNELS];
        for (value, sample) in values.iter_mut().zip(self.pixels.slice(s![row, col, ..])) {
            *value = *sample;
        }
        Some(values)
    }
}

/// Every patch extracted during one run, shared read-only by all attempts
#[derive(Debug, Clone)]
pub struct PatchPool<T> {
    patches: Vec<Patch<T>>,
}

impl<T> Default for PatchPool<T> {
    fn default() -> Self {
        Self {
            patches: Vec::new(),
        }
    }
}

impl<T: Channel> PatchPool<T> {
    /// Build a pool from already extracted patches
    pub const fn new(patches: Vec<Patch<T>>) -> Self {
        Self { patches }
    }

    /// Number of patches
    pub const fn len(&self) -> usize {
        self.patches.len()
    }

    /// True when no patch is available
    pub const fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Get a patch by index
    pub fn get(&self, index: usize) -> Option<&Patch<T>> {
        self.patches.get(index)
    }

    /// Iterate over all patches
    pub fn iter(&self) -> std::slice::Iter<'_, Patch<T>> {
        self.patches.iter()
    }
}

impl<T: Channel> Extend<Patch<T>> for PatchPool<T> {
    fn extend<I: IntoIterator<Item = Patch<T>>>(&mut self, iter: I) {
        self.patches.extend(iter);
    }
}
