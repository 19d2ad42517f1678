//! Tests for first-writer-wins compositing

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use patchwork::algorithm::compositor::{Footprint, composite, footprint};
    use patchwork::spatial::canvas::Canvas;
    use patchwork::spatial::patch::Patch;

    fn solid_patch(rows: usize, cols: usize, color: [u8; 3]) -> Patch<u8> {
        let pixels = Array3::from_shape_fn((rows, cols, 4), |(_, _, channel)| {
            color.get(channel).copied().unwrap_or(255)
        });
        Patch::new(pixels, 0).expect("solid patch is valid")
    }

    // Tests the single-pixel scenario on a 2x2 canvas
    #[test]
    fn test_one_pixel_patch_on_two_by_two_canvas() {
        let mut canvas = Canvas::<u8>::new(2, 2);
        let patch = solid_patch(1, 1, [12, 34, 56]);

        let newly_covered = composite(&mut canvas, &patch, [0, 0]);

        assert_eq!(newly_covered, 1);
        let coverage: Vec<bool> = [(0, 0), (0, 1), (1, 0), (1, 1)]
            .iter()
            .map(|&(r, c)| canvas.is_covered(r, c))
            .collect();
        assert_eq!(coverage, vec![true, false, false, false]);
        assert_eq!(canvas.pixel(0, 0), Some([12, 34, 56, 255]));
    }

    // Tests that the target rectangle uses floor half-extents
    #[test]
    fn test_footprint_on_canvas() {
        let area = footprint((10, 10), (3, 4), [5, 5]);
        assert_eq!(
            area,
            Some(Footprint {
                rows: 4..7,
                cols: 3..7,
                source_row: 0,
                source_col: 0,
            })
        );
        assert!(area.is_some_and(|a| a.area() == 12));
    }

    // Tests clipping at the top-left and bottom-right canvas edges
    // Verified by skipping the source offset adjustment
    #[test]
    fn test_footprint_clipping() {
        let top_left = footprint((6, 6), (3, 3), [0, 0]);
        assert!(top_left.is_some_and(|a| a.rows == (0..2) && a.source_row == 1 && a.source_col == 1));

        let bottom_right = footprint((6, 6), (4, 4), [5, 5]);
        assert!(bottom_right.is_some_and(|a| a.rows == (3..6) && a.cols == (3..6) && a.source_row == 0));
    }

    // Tests that rectangles entirely off the canvas are no-ops
    #[test]
    fn test_off_canvas_is_noop() {
        assert!(footprint((4, 4), (3, 3), [-5, 1]).is_none());
        assert!(footprint((4, 4), (3, 3), [1, 9]).is_none());

        let mut canvas = Canvas::<u8>::new(4, 4);
        assert_eq!(composite(&mut canvas, &solid_patch(3, 3, [1, 1, 1]), [-5, -5]), 0);
        assert_eq!(canvas.covered_count(), 0);
    }

    // Tests that centers at the ends of the integer range clip instead of overflowing
    #[test]
    fn test_extreme_centers() {
        assert!(footprint((4, 4), (5, 5), [i64::MIN, 1]).is_none());
        assert!(footprint((4, 4), (5, 5), [1, i64::MIN]).is_none());
        assert!(footprint((4, 4), (5, 5), [i64::MAX, 1]).is_none());
        assert!(footprint((4, 4), (5, 5), [1, i64::MAX]).is_none());

        let mut canvas = Canvas::<u8>::new(4, 4);
        let patch = solid_patch(5, 5, [9, 9, 9]);
        assert_eq!(composite(&mut canvas, &patch, [i64::MIN, i64::MAX]), 0);
        assert_eq!(composite(&mut canvas, &patch, [i64::MAX, i64::MIN]), 0);
        assert_eq!(canvas.covered_count(), 0);
    }

    // Tests that covered pixels keep their first writer
    // Verified by writing every pixel of the footprint unconditionally
    #[test]
    fn test_covered_pixels_are_never_overwritten() {
        let mut canvas = Canvas::<u8>::new(3, 3);
        assert_eq!(composite(&mut canvas, &solid_patch(1, 3, [200, 0, 0]), [1, 1]), 3);

        let newly_covered = composite(&mut canvas, &solid_patch(3, 3, [0, 0, 200]), [1, 1]);

        assert_eq!(newly_covered, 6);
        assert!(canvas.is_complete());
        for col in 0..3 {
            assert_eq!(canvas.pixel(1, col), Some([200, 0, 0, 255]));
            assert_eq!(canvas.pixel(0, col), Some([0, 0, 200, 255]));
        }
    }

    // Tests that transparent patch pixels leave the canvas open
    #[test]
    fn test_transparent_pixels_do_not_cover() {
        let mut pixels = Array3::<f32>::zeros((3, 3, 4));
        for channel in 0..4 {
            if let Some(value) = pixels.get_mut([0, 0, channel]) {
                *value = 1.0;
            }
            if let Some(value) = pixels.get_mut([2, 2, channel]) {
                *value = 1.0;
            }
        }
        let patch = Patch::new(pixels, 0).expect("diagonal patch is valid");
        let mut canvas = Canvas::<f32>::new(3, 3);

        assert_eq!(composite(&mut canvas, &patch, [1, 1]), 2);
        assert_eq!(canvas.uncovered_count(), 7);
        assert!(!canvas.is_covered(1, 1));
    }
}
