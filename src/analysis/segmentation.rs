//! Superpixel segmentation by simple linear iterative clustering (SLIC)
//!
//! Pixels are clustered in a joint CIELab color and image position space.
//! Cluster centers start on a regular grid and only compete for pixels
//! inside a local window, which keeps every iteration linear in the number
//! of pixels. A final connectivity pass guarantees each label is a single
//! connected region.

use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView3};

use crate::analysis::connectivity::enforce_connectivity;
use crate::analysis::labels::LabelMap;
use crate::io::configuration::{
    DEFAULT_COMPACTNESS, DEFAULT_SEGMENTATION_ITERATIONS, DEFAULT_SEGMENTS, DEFAULT_SIGMA,
    MIN_SEGMENT_SIZE_FACTOR,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::color::{lab_distance_squared, srgb_to_lab};
use crate::spatial::raster::Channel;

/// Parameters controlling superpixel clustering
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentationConfig {
    /// Target number of clusters
    pub segments: usize,
    /// Balance between color fidelity and spatial regularity; higher is more regular
    pub compactness: f32,
    /// Maximum number of assignment/update rounds
    pub max_iterations: usize,
    /// Standard deviation of the Gaussian pre-smoothing, 0 disables it
    pub sigma: f32,
    /// Merge disconnected fragments so each label is one region
    pub enforce_connectivity: bool,
    /// Fragments below this fraction of the mean segment area are merged away
    pub min_size_factor: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            compactness: DEFAULT_COMPACTNESS,
            max_iterations: DEFAULT_SEGMENTATION_ITERATIONS,
            sigma: DEFAULT_SIGMA,
            enforce_connectivity: true,
            min_size_factor: MIN_SEGMENT_SIZE_FACTOR,
        }
    }
}

impl SegmentationConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero segment count, a non-positive or
    /// non-finite compactness, or a negative or non-finite sigma or size factor.
    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 {
            return Err(invalid_parameter(
                "segments",
                &self.segments,
                &"at least one segment is required",
            ));
        }
        if !self.compactness.is_finite() || self.compactness <= 0.0 {
            return Err(invalid_parameter(
                "compactness",
                &self.compactness,
                &"must be a positive finite number",
            ));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(invalid_parameter(
                "sigma",
                &self.sigma,
                &"must be a non-negative finite number",
            ));
        }
        if !self.min_size_factor.is_finite() || self.min_size_factor < 0.0 {
            return Err(invalid_parameter(
                "min_size_factor",
                &self.min_size_factor,
                &"must be a non-negative finite number",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct ClusterCenter {
    color: [f32; 3],
    row: f32,
    col: f32,
}

// Regular seeding grid and the per-center search window it implies
struct SeedGrid {
    rows: usize,
    cols: usize,
    window_rows: f32,
    window_cols: f32,
}

impl SeedGrid {
    fn new(image_rows: usize, image_cols: usize, segments: usize, step: f32) -> Self {
        let cols = ((image_cols as f32 / step).round() as usize).clamp(1, segments.min(image_cols));
        let rows = (segments / cols).clamp(1, image_rows);
        let cell_rows = image_rows as f32 / rows as f32;
        let cell_cols = image_cols as f32 / cols as f32;

        Self {
            rows,
            cols,
            window_rows: step.max(cell_rows),
            window_cols: step.max(cell_cols),
        }
    }

    // Cell containing the pixel, numbered in raster order
    fn cell_of(&self, row: usize, col: usize, image_rows: usize, image_cols: usize) -> u32 {
        let cell_row = (row * self.rows / image_rows).min(self.rows - 1);
        let cell_col = (col * self.cols / image_cols).min(self.cols - 1);
        (cell_row * self.cols + cell_col) as u32
    }
}

fn window(center: f32, radius: f32, len: usize) -> std::ops::Range<usize> {
    let start = (center - radius).floor().max(0.0) as usize;
    let end = ((center + radius).ceil().max(0.0) as usize + 1).min(len);
    start.min(end)..end
}

/// Superpixel segmenter with fixed configuration
#[derive(Clone, Debug, Default)]
pub struct SlicSegmenter {
    config: SegmentationConfig,
}

impl SlicSegmenter {
    /// Create a segmenter after validating its configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is out of range.
    pub fn new(config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub const fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Partition a color image into spatially and chromatically coherent clusters
    ///
    /// Only the first three channels are read. Degenerate input (at most one
    /// pixel, fewer than three channels, or a single requested segment)
    /// yields a map with one label.
    pub fn segment<T: Channel>(&self, image: ArrayView3<'_, T>) -> LabelMap {
        let (rows, cols, channels) = image.dim();
        let segments = self.config.segments;
        if rows * cols <= 1 || channels < 3 || segments <= 1 {
            return LabelMap::uniform(rows, cols);
        }

        let lab = self.smoothed_lab(image);
        let step = ((rows * cols) as f32 / segments as f32).sqrt().max(1.0);
        let grid = SeedGrid::new(rows, cols, segments, step);
        let spatial_weight = (self.config.compactness / step).powi(2);

        let mut centers = Vec::with_capacity(grid.rows * grid.cols);
        for grid_row in 0..grid.rows {
            for grid_col in 0..grid.cols {
                let row = (grid_row as f32 + 0.5) * rows as f32 / grid.rows as f32;
                let col = (grid_col as f32 + 0.5) * cols as f32 / grid.cols as f32;
                let color = lab
                    .get([row as usize, col as usize])
                    .copied()
                    .unwrap_or_default();
                centers.push(ClusterCenter { color, row, col });
            }
        }

        let mut labels =
            Array2::from_shape_fn((rows, cols), |(row, col)| grid.cell_of(row, col, rows, cols));

        for _ in 0..self.config.max_iterations {
            let assigned = assign_pixels(&lab, &centers, &labels, &grid, spatial_weight);
            let changed = assigned != labels;
            labels = assigned;
            update_centers(&lab, &labels, &mut centers);
            if !changed {
                break;
            }
        }

        if self.config.enforce_connectivity {
            let min_size =
                (self.config.min_size_factor * (rows * cols) as f32 / segments as f32) as usize;
            labels = enforce_connectivity(&labels, min_size, segments);
        }

        LabelMap::new(labels)
    }

    // Blur each color channel, then convert every pixel to Lab
    fn smoothed_lab<T: Channel>(&self, image: ArrayView3<'_, T>) -> Array2<[f32; 3]> {
        // imageproc panics on sigma <= 0
        if self.config.sigma <= 0.0 {
            return lab_image(image);
        }

        let (rows, cols, _) = image.dim();
        let channels: [GrayImage; 3] = std::array::from_fn(|c| {
            GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
                let sample = image
                    .get([y as usize, x as usize, c])
                    .map_or(0, |value| u8::from_unit(value.to_unit()));
                Luma([sample])
            })
        });

        let channels =
            channels.map(|channel| imageproc::filter::gaussian_blur_f32(&channel, self.config.sigma));

        Array2::from_shape_fn((rows, cols), |(row, col)| {
            let sample = |c: usize| {
                channels
                    .get(c)
                    .map_or(0.0, |channel| channel.get_pixel(col as u32, row as u32).0[0].to_unit())
            };
            srgb_to_lab(sample(0), sample(1), sample(2))
        })
    }
}

/// Convert the first three channels of every pixel to CIELab at full precision
///
/// Pixels with fewer than three channels read the missing ones as zero.
pub fn lab_image<T: Channel>(image: ArrayView3<'_, T>) -> Array2<[f32; 3]> {
    let (rows, cols, _) = image.dim();
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let sample = |c: usize| image.get([row, col, c]).map_or(0.0, |value| value.to_unit());
        srgb_to_lab(sample(0), sample(1), sample(2))
    })
}

// Give every pixel to the nearest center whose window contains it;
// pixels outside all windows keep their previous label
fn assign_pixels(
    lab: &Array2<[f32; 3]>,
    centers: &[ClusterCenter],
    previous: &Array2<u32>,
    grid: &SeedGrid,
    spatial_weight: f32,
) -> Array2<u32> {
    let (rows, cols) = lab.dim();
    let mut distances = Array2::from_elem((rows, cols), f32::INFINITY);
    let mut assigned = previous.clone();

    for (index, center) in centers.iter().enumerate() {
        for row in window(center.row, grid.window_rows, rows) {
            for col in window(center.col, grid.window_cols, cols) {
                let Some(color) = lab.get([row, col]) else {
                    continue;
                };
                let d_row = row as f32 - center.row;
                let d_col = col as f32 - center.col;
                let distance = lab_distance_squared(color, &center.color)
                    + spatial_weight * (d_row * d_row + d_col * d_col);

                if let Some(best) = distances.get_mut([row, col]) {
                    if distance < *best {
                        *best = distance;
                        if let Some(label) = assigned.get_mut([row, col]) {
                            *label = index as u32;
                        }
                    }
                }
            }
        }
    }

    assigned
}

// Move each center to the mean color and position of its members;
// centers without members stay where they are
fn update_centers(lab: &Array2<[f32; 3]>, labels: &Array2<u32>, centers: &mut [ClusterCenter]) {
    let mut sums = vec![[0.0_f64; 6]; centers.len()];

    for ((row, col), &label) in labels.indexed_iter() {
        let (Some(sum), Some(color)) = (sums.get_mut(label as usize), lab.get([row, col])) else {
            continue;
        };
        let [l, a, b, acc_row, acc_col, count] = sum;
        *l += f64::from(color[0]);
        *a += f64::from(color[1]);
        *b += f64::from(color[2]);
        *acc_row += row as f64;
        *acc_col += col as f64;
        *count += 1.0;
    }

    for (center, [l, a, b, row, col, count]) in centers.iter_mut().zip(sums) {
        if count > 0.0 {
            center.color = [(l / count) as f32, (a / count) as f32, (b / count) as f32];
            center.row = (row / count) as f32;
            center.col = (col / count) as f32;
        }
    }
}
