//! Tests for channel domains and alpha augmentation

#[cfg(test)]
mod tests {
    use ndarray::{Array3, s};
    use patchwork::CollageError;
    use patchwork::spatial::raster::{ALPHA, Channel, RGBA_CHANNELS, coverage, with_alpha};

    // Tests that 8-bit images become opaque at 255 with colors untouched
    // Verified by filling alpha with 1 instead of the domain maximum
    #[test]
    fn test_with_alpha_u8_is_opaque() {
        let image = Array3::from_shape_fn((2, 3, 3), |(r, c, ch)| (r * 30 + c * 10 + ch) as u8);

        let augmented = with_alpha(image.view()).expect("three channels are enough");

        assert_eq!(augmented.dim(), (2, 3, RGBA_CHANNELS));
        assert!(augmented.slice(s![.., .., ALPHA]).iter().all(|&a| a == 255));
        assert_eq!(augmented.slice(s![.., .., ..3]), image);
    }

    // Tests that float images become opaque at 1.0
    #[test]
    fn test_with_alpha_f32_is_opaque() {
        let image = Array3::<f32>::from_elem((2, 2, 3), 0.25);

        let augmented = with_alpha(image.view()).expect("three channels are enough");

        assert!(
            augmented
                .slice(s![.., .., ALPHA])
                .iter()
                .all(|&a| (a - 1.0).abs() < f32::EPSILON)
        );
        assert!(augmented.get([1, 1, 2]).is_some_and(|&v| (v - 0.25).abs() < f32::EPSILON));
    }

    // Tests that an existing fourth channel is replaced, not kept
    #[test]
    fn test_with_alpha_replaces_extra_channels() {
        let image = Array3::<u8>::from_elem((1, 2, 4), 7);

        let augmented = with_alpha(image.view()).expect("four channels are enough");

        assert_eq!(augmented.dim(), (1, 2, 4));
        assert_eq!(augmented.get([0, 1, ALPHA]).copied(), Some(255));
        assert_eq!(augmented.get([0, 1, 0]).copied(), Some(7));
    }

    // Tests that grayscale-like input is rejected
    #[test]
    fn test_with_alpha_rejects_two_channels() {
        let image = Array3::<u8>::zeros((2, 2, 2));

        let result = with_alpha(image.view());
        assert!(matches!(result, Err(CollageError::InvalidSourceData { .. })));
    }

    // Tests that coverage is only exposed on 4-channel rasters
    #[test]
    fn test_coverage_view() {
        let rgb = Array3::<u8>::zeros((2, 2, 3));
        assert!(coverage(&rgb).is_none());

        let rgba = with_alpha(rgb.view()).expect("three channels are enough");
        assert!(coverage(&rgba).is_some_and(|alpha| alpha.iter().all(|&a| a == u8::OPAQUE)));
    }

    // Tests unit-interval mapping in both domains
    #[test]
    fn test_channel_unit_mapping() {
        assert!((255_u8.to_unit() - 1.0).abs() < f32::EPSILON);
        assert_eq!(u8::from_unit(0.5), 128);
        assert_eq!(u8::from_unit(2.0), 255);
        assert!((f32::from_unit(-1.0)).abs() < f32::EPSILON);
        assert!((f32::OPAQUE - 1.0).abs() < f32::EPSILON);
    }
}
