//! Per-pixel cluster label maps

use bitvec::prelude::*;
use ndarray::Array2;

/// Cluster identifier of every pixel of a source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Array2<u32>,
}

impl LabelMap {
    /// Wrap a `(rows, cols)` array of labels
    pub const fn new(labels: Array2<u32>) -> Self {
        Self { labels }
    }

    /// Map assigning label 0 to every pixel
    pub fn uniform(rows: usize, cols: usize) -> Self {
        Self::new(Array2::zeros((rows, cols)))
    }

    /// Dimensions as (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    /// Label of the pixel at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.labels.get([row, col]).copied()
    }

    /// Underlying label array
    pub const fn as_array(&self) -> &Array2<u32> {
        &self.labels
    }

    /// Every label that occurs at least once, in ascending order
    ///
    /// Labels need not be dense; gaps in the numbering are skipped.
    pub fn distinct_labels(&self) -> Vec<u32> {
        let Some(&max) = self.labels.iter().max() else {
            return Vec::new();
        };

        let mut present = bitvec![0; max as usize + 1];
        for &label in &self.labels {
            present.set(label as usize, true);
        }
        present.iter_ones().map(|label| label as u32).collect()
    }

    /// Number of distinct labels
    pub fn label_count(&self) -> usize {
        self.distinct_labels().len()
    }

    /// Number of pixels carrying `label`
    pub fn pixel_count(&self, label: u32) -> usize {
        self.labels.iter().filter(|&&value| value == label).count()
    }
}
