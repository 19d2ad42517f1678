//! Connectivity enforcement for cluster label maps
//!
//! Clustering in joint color and position space can leave one label spread
//! over several disconnected fragments. Each fragment becomes its own
//! region; fragments that are too small, or surplus fragments beyond the
//! segment budget, are merged into their largest neighbor. Merging two
//! adjacent connected regions yields a connected region, so every output
//! label is a single 4-connected area.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use image::{ImageBuffer, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use ndarray::Array2;

// Disjoint-set forest over component ids, with the neighbor set of every root
struct Regions {
    parent: Vec<u32>,
    size: Vec<usize>,
    neighbors: Vec<HashSet<u32>>,
}

impl Regions {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count as u32).collect(),
            size: vec![0; count],
            neighbors: vec![HashSet::new(); count],
        }
    }

    fn find(&mut self, mut id: u32) -> u32 {
        let mut root = id;
        while let Some(&parent) = self.parent.get(root as usize) {
            if parent == root {
                break;
            }
            root = parent;
        }
        // Path compression
        while let Some(parent) = self.parent.get_mut(id as usize) {
            if *parent == root {
                break;
            }
            let next = *parent;
            *parent = root;
            id = next;
        }
        root
    }

    fn size_of(&self, root: u32) -> usize {
        self.size.get(root as usize).copied().unwrap_or(0)
    }

    fn connect(&mut self, a: u32, b: u32) {
        if let Some(set) = self.neighbors.get_mut(a as usize) {
            set.insert(b);
        }
        if let Some(set) = self.neighbors.get_mut(b as usize) {
            set.insert(a);
        }
    }

    // Largest neighbor of a root, lowest id on ties
    fn largest_neighbor(&self, root: u32) -> Option<u32> {
        self.neighbors
            .get(root as usize)?
            .iter()
            .copied()
            .max_by_key(|&other| (self.size_of(other), Reverse(other)))
    }

    // Both ids must be roots; neighbor sets only ever hold roots
    fn merge_into(&mut self, from: u32, into: u32) {
        let moved = self.size_of(from);
        if let Some(parent) = self.parent.get_mut(from as usize) {
            *parent = into;
        }
        if let Some(size) = self.size.get_mut(into as usize) {
            *size += moved;
        }
        if let Some(size) = self.size.get_mut(from as usize) {
            *size = 0;
        }

        let adjacent = self
            .neighbors
            .get_mut(from as usize)
            .map(std::mem::take)
            .unwrap_or_default();
        for other in adjacent {
            if let Some(set) = self.neighbors.get_mut(other as usize) {
                set.remove(&from);
            }
            if other != into {
                self.connect(other, into);
            }
        }
    }
}

/// Relabel so that every label is one 4-connected region
///
/// Fragments smaller than `min_size` pixels are absorbed by their largest
/// neighbor, then the smallest remaining regions are absorbed until at most
/// `max_segments` are left. Output labels are dense, numbered from 0 in
/// raster order of first appearance.
pub fn enforce_connectivity(labels: &Array2<u32>, min_size: usize, max_segments: usize) -> Array2<u32> {
    let (rows, cols) = labels.dim();
    if rows == 0 || cols == 0 {
        return labels.clone();
    }

    let label_image: ImageBuffer<Luma<u32>, Vec<u32>> =
        ImageBuffer::from_fn(cols as u32, rows as u32, |x, y| {
            Luma([labels.get([y as usize, x as usize]).copied().unwrap_or(0)])
        });
    // No label equals u32::MAX, so every pixel belongs to some component
    let components = connected_components(&label_image, Connectivity::Four, Luma([u32::MAX]));

    let component_at =
        |row: usize, col: usize| components.get_pixel(col as u32, row as u32).0[0];

    let max_id = components.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    let mut regions = Regions::new(max_id as usize + 1);
    for row in 0..rows {
        for col in 0..cols {
            let id = component_at(row, col);
            if let Some(size) = regions.size.get_mut(id as usize) {
                *size += 1;
            }
            if col + 1 < cols {
                let right = component_at(row, col + 1);
                if right != id {
                    regions.connect(id, right);
                }
            }
            if row + 1 < rows {
                let below = component_at(row + 1, col);
                if below != id {
                    regions.connect(id, below);
                }
            }
        }
    }

    // Min-heap of (size, id); entries whose size is stale are skipped on pop
    let mut queue: BinaryHeap<Reverse<(usize, u32)>> = (0..=max_id)
        .filter(|&id| regions.size_of(id) > 0)
        .map(|id| Reverse((regions.size_of(id), id)))
        .collect();
    let mut remaining = queue.len();

    while remaining > 1 {
        let Some(Reverse((size, smallest))) = queue.pop() else {
            break;
        };
        if regions.find(smallest) != smallest || regions.size_of(smallest) != size {
            continue;
        }
        if size >= min_size && remaining <= max_segments {
            break;
        }
        let Some(neighbor) = regions.largest_neighbor(smallest) else {
            break;
        };

        regions.merge_into(smallest, neighbor);
        remaining -= 1;
        queue.push(Reverse((regions.size_of(neighbor), neighbor)));
    }

    let mut dense: Vec<Option<u32>> = vec![None; max_id as usize + 1];
    let mut next_label = 0;
    let mut output = Array2::zeros((rows, cols));
    for ((row, col), value) in output.indexed_iter_mut() {
        let root = regions.find(component_at(row, col));
        let Some(slot) = dense.get_mut(root as usize) else {
            continue;
        };
        *value = *slot.get_or_insert_with(|| {
            let label = next_label;
            next_label += 1;
            label
        });
    }
    output
}
