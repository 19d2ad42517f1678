//! Choosing which patch goes where
//!
//! Every step draws one patch uniformly from the pool and one uncovered
//! canvas pixel uniformly from the coverage index. The policy decides how
//! that pixel becomes a compositing center.

use clap::ValueEnum;
use rand::Rng;

use crate::spatial::canvas::Canvas;
use crate::spatial::patch::{Patch, PatchPool};
use crate::spatial::raster::Channel;

/// Rule turning a sampled uncovered pixel into a compositing center
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PlacementPolicy {
    /// Center the patch on the sampled pixel
    ///
    /// A patch whose cluster misses its own center can leave the sampled
    /// pixel empty, so a step may make no progress.
    Centered,
    /// Align a random covered pixel of the patch with the sampled pixel
    ///
    /// Every step covers at least the sampled pixel, so an attempt needs at
    /// most one step per canvas pixel.
    #[default]
    Anchored,
}

/// One (patch, position) decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Index of the chosen patch in the pool
    pub patch_index: usize,
    /// Uncovered canvas pixel that was sampled
    pub target: [usize; 2],
    /// Canvas position of the patch center passed to the compositor
    pub center: [i64; 2],
}

// Center that makes patch pixel `anchor` land on `target`
fn anchored_center<T: Channel>(patch: &Patch<T>, anchor: [usize; 2], target: [usize; 2]) -> [i64; 2] {
    let [half_rows, half_cols] = patch.center();
    [
        target[0] as i64 - anchor[0] as i64 + half_rows as i64,
        target[1] as i64 - anchor[1] as i64 + half_cols as i64,
    ]
}

impl PlacementPolicy {
    /// Draw a patch and a position for the next compositing step
    ///
    /// Returns `None` when the pool is empty or the canvas is complete.
    pub fn choose<T, R>(self, canvas: &Canvas<T>, pool: &PatchPool<T>, rng: &mut R) -> Option<Placement>
    where
        T: Channel,
        R: Rng + ?Sized,
    {
        if pool.is_empty() {
            return None;
        }
        let patch_index = rng.random_range(0..pool.len());
        let patch = pool.get(patch_index)?;
        let target = canvas.sample_uncovered(rng)?;

        let center = match self {
            Self::Centered => [target[0] as i64, target[1] as i64],
            Self::Anchored => {
                let offsets = patch.covered_offsets();
                let anchor = offsets.get(rng.random_range(0..offsets.len())).copied()?;
                anchored_center(patch, anchor, target)
            }
        };

        Some(Placement {
            patch_index,
            target,
            center,
        })
    }
}
