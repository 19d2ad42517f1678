//! Persisting finished collages to disk

use std::path::{Path, PathBuf};

use log::info;

use crate::algorithm::assembly::CollageSink;
use crate::io::display::Viewer;
use crate::io::error::Result;
use crate::io::image::save_canvas;
use crate::spatial::canvas::Canvas;
use crate::spatial::raster::Channel;

/// Overwrites one output file with every finished collage, then optionally shows it
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
    viewer: Option<Viewer>,
}

impl FileSink {
    /// Save collages to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            viewer: None,
        }
    }

    /// Show every saved collage with `viewer`
    #[must_use]
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Channel> CollageSink<T> for FileSink {
    fn deliver(&mut self, attempt: usize, canvas: &Canvas<T>) -> Result<()> {
        save_canvas(canvas, &self.path)?;
        info!("Collage {attempt} written to {}", self.path.display());

        if let Some(viewer) = &self.viewer {
            viewer.show(&self.path)?;
        }
        Ok(())
    }
}
