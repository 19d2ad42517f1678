//! Tests for the external viewer

#[cfg(test)]
mod tests {
    use patchwork::CollageError;
    use patchwork::io::display::Viewer;
    use std::path::Path;

    // Tests that a missing program is reported, not fatal
    #[test]
    fn test_missing_program() {
        let viewer = Viewer::new("patchwork-viewer-that-does-not-exist");
        let result = viewer.show(Path::new("collage.jpg"));
        assert!(matches!(result, Err(CollageError::Display { .. })));
    }

    // Tests the exit status is honored
    #[cfg(unix)]
    #[test]
    fn test_exit_status() {
        assert!(Viewer::new("true").show(Path::new("collage.jpg")).is_ok());

        let failed = Viewer::new("false").show(Path::new("collage.jpg"));
        assert!(matches!(failed, Err(CollageError::Display { ref program, .. }) if program == "false"));
    }

    // Tests accessors
    #[test]
    fn test_program_name() {
        assert_eq!(Viewer::new("feh").program(), "feh");
    }
}
