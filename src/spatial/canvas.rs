//! Fixed-size collage canvas with coverage tracking
//!
//! A canvas pixel is covered when its alpha channel is non-zero. The
//! [`CoverageIndex`] mirrors that state so that completion checks and
//! uniform sampling of empty pixels do not rescan the pixel array.

use ndarray::{Array3, s};
use rand::Rng;

use crate::spatial::coverage::CoverageIndex;
use crate::spatial::raster::{ALPHA, Channel, RGBA_CHANNELS, Raster};

/// Collage under construction
#[derive(Debug, Clone)]
pub struct Canvas<T> {
    pixels: Raster<T>,
    uncovered: CoverageIndex,
}

impl<T: Channel> Canvas<T> {
    /// Create a canvas with every pixel zeroed, so nothing is covered
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            pixels: Array3::zeros((rows, cols, RGBA_CHANNELS)),
            uncovered: CoverageIndex::new(rows, cols),
        }
    }

    /// Canvas height
    pub fn rows(&self) -> usize {
        self.pixels.dim().0
    }

    /// Canvas width
    pub fn cols(&self) -> usize {
        self.pixels.dim().1
    }

    /// Pixel data as `(rows, cols, 4)`
    pub const fn pixels(&self) -> &Raster<T> {
        &self.pixels
    }

    /// Total number of pixels
    pub fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Number of pixels still waiting for content
    pub const fn uncovered_count(&self) -> usize {
        self.uncovered.len()
    }

    /// Number of pixels with non-zero coverage
    pub fn covered_count(&self) -> usize {
        self.area() - self.uncovered.len()
    }

    /// True once every pixel is covered
    pub const fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    /// Test whether the pixel at `(row, col)` carries content
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && !self.uncovered.contains(row, col)
    }

    /// Read the four channels of one pixel
    pub fn pixel(&self, row: usize, col: usize) -> Option<[T; RGBA_CHANNELS]> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let lane = self.pixels.slice(s![row, col, ..]);
        let mut values = [T::zero(); RGBA_CHANNELS];
        for (value, sample) in values.iter_mut().zip(lane.iter()) {
            *value = *sample;
        }
        Some(values)
    }

    /// Pick an uncovered pixel uniformly at random
    pub fn sample_uncovered<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[usize; 2]> {
        self.uncovered.sample(rng)
    }

    /// Write `value` at `(row, col)` if, and only if, that pixel is uncovered
    ///
    /// Returns `true` when the write turned the pixel covered. A written
    /// pixel whose own coverage is zero leaves the pixel uncovered.
    pub fn write_if_uncovered(&mut self, row: usize, col: usize, value: [T; RGBA_CHANNELS]) -> bool {
        if !self.uncovered.contains(row, col) {
            return false;
        }
        let mut lane = self.pixels.slice_mut(s![row, col, ..]);
        for (sample, &channel) in lane.iter_mut().zip(value.iter()) {
            *sample = channel;
        }
        let covered = value.get(ALPHA).is_some_and(|alpha| !alpha.is_zero());
        if covered {
            self.uncovered.remove(row, col);
        }
        covered
    }
}
