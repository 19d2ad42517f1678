//! First-writer-wins compositing of patches onto the canvas
//!
//! A patch is placed by its geometric center. Both half-extents use floor
//! division, so the target rectangle always spans exactly the patch extent
//! before clipping. Pixels that fall outside the canvas are dropped.

use std::ops::Range;

use crate::spatial::canvas::Canvas;
use crate::spatial::patch::Patch;
use crate::spatial::raster::Channel;

/// Clipped correspondence between a patch and the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    /// Canvas rows receiving patch content
    pub rows: Range<usize>,
    /// Canvas columns receiving patch content
    pub cols: Range<usize>,
    /// Patch row that lands on `rows.start`
    pub source_row: usize,
    /// Patch column that lands on `cols.start`
    pub source_col: usize,
}

impl Footprint {
    /// Number of canvas pixels inside the footprint
    pub fn area(&self) -> usize {
        self.rows.len() * self.cols.len()
    }
}

// Clip a span starting at `start` of length `len` to `[0, limit)`;
// returns the destination range and the offset into the source
fn clip_span(start: i64, len: usize, limit: usize) -> Option<(Range<usize>, usize)> {
    let end = start.saturating_add(i64::try_from(len).unwrap_or(i64::MAX));
    let clipped_start = start.max(0);
    let clipped_end = end.min(i64::try_from(limit).unwrap_or(i64::MAX));
    if clipped_start >= clipped_end {
        return None;
    }
    // A span that reaches the canvas starts at most `len` before it
    let offset = usize::try_from(clipped_start.saturating_sub(start)).ok()?;
    Some((clipped_start as usize..clipped_end as usize, offset))
}

/// Compute where a `patch_dims` patch centered at `center` lands on a `canvas_dims` canvas
///
/// Returns `None` when nothing of the patch overlaps the canvas.
pub fn footprint(
    canvas_dims: (usize, usize),
    patch_dims: (usize, usize),
    center: [i64; 2],
) -> Option<Footprint> {
    let half = |extent: usize| i64::try_from(extent / 2).unwrap_or(i64::MAX);
    let row_start = center[0].saturating_sub(half(patch_dims.0));
    let col_start = center[1].saturating_sub(half(patch_dims.1));

    let (rows, source_row) = clip_span(row_start, patch_dims.0, canvas_dims.0)?;
    let (cols, source_col) = clip_span(col_start, patch_dims.1, canvas_dims.1)?;

    Some(Footprint {
        rows,
        cols,
        source_row,
        source_col,
    })
}

/// Paste `patch` centered at `center`, writing only into uncovered canvas pixels
///
/// Already covered pixels keep their content whatever the patch holds at
/// that offset. Returns the number of pixels that became covered.
pub fn composite<T: Channel>(canvas: &mut Canvas<T>, patch: &Patch<T>, center: [i64; 2]) -> usize {
    let Some(area) = footprint(
        (canvas.rows(), canvas.cols()),
        (patch.rows(), patch.cols()),
        center,
    ) else {
        return 0;
    };

    let mut newly_covered = 0;
    for (source_row, row) in (area.source_row..).zip(area.rows.clone()) {
        for (source_col, col) in (area.source_col..).zip(area.cols.clone()) {
            if canvas.is_covered(row, col) {
                continue;
            }
            let Some(value) = patch.pixel(source_row, source_col) else {
                continue;
            };
            if canvas.write_if_uncovered(row, col, value) {
                newly_covered += 1;
            }
        }
    }
    newly_covered
}
