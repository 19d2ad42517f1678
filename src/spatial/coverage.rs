//! Index of uncovered canvas pixels
//!
//! A sparse set over linear pixel indices: membership test, removal and
//! uniform sampling are all O(1), so the assembly loop never rescans the
//! canvas to find an empty pixel.

use rand::Rng;

const ABSENT: usize = usize::MAX;

/// Set of pixel positions that have not been covered yet
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    /// Uncovered linear indices, in no particular order
    members: Vec<usize>,
    /// Slot of each linear index inside `members`, or `ABSENT`
    slots: Vec<usize>,
    cols: usize,
}

impl CoverageIndex {
    /// Create an index in which every pixel of a `rows x cols` grid is uncovered
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows * cols;
        Self {
            members: (0..len).collect(),
            slots: (0..len).collect(),
            cols,
        }
    }

    /// Number of uncovered pixels
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    /// True once every pixel is covered
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Test whether the pixel at `(row, col)` is still uncovered
    pub fn contains(&self, row: usize, col: usize) -> bool {
        if col >= self.cols {
            return false;
        }
        self.slots
            .get(row * self.cols + col)
            .is_some_and(|&slot| slot != ABSENT)
    }

    /// Mark the pixel at `(row, col)` as covered
    ///
    /// Returns `false` if the pixel was already covered or out of range.
    pub fn remove(&mut self, row: usize, col: usize) -> bool {
        if col >= self.cols {
            return false;
        }
        let index = row * self.cols + col;
        let Some(slot) = self.slots.get(index).copied() else {
            return false;
        };
        if slot == ABSENT {
            return false;
        }

        self.members.swap_remove(slot);
        if let Some(&moved) = self.members.get(slot) {
            if let Some(moved_slot) = self.slots.get_mut(moved) {
                *moved_slot = slot;
            }
        }
        if let Some(removed_slot) = self.slots.get_mut(index) {
            *removed_slot = ABSENT;
        }
        true
    }

    /// Draw one uncovered position uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[usize; 2]> {
        if self.members.is_empty() {
            return None;
        }
        let index = self
            .members
            .get(rng.random_range(0..self.members.len()))
            .copied()?;
        Some([index / self.cols, index % self.cols])
    }
}
