//! Terminal progress for patch extraction and canvas coverage

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

use crate::algorithm::assembly::{AssemblyObserver, StepReport};
use crate::io::configuration::PROGRESS_REFRESH_HZ;
use crate::spatial::canvas::Canvas;
use crate::spatial::raster::Channel;

static EXTRACTION_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Images: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

static COVERAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:40.green/white}] {percent:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates the extraction bar and the per-attempt coverage bar
pub struct ProgressManager {
    multi_progress: MultiProgress,
    extraction_bar: Option<ProgressBar>,
    coverage_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager drawing to stderr
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(
                PROGRESS_REFRESH_HZ,
            )),
            extraction_bar: None,
            coverage_bar: None,
        }
    }

    /// Create a progress manager that never draws
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            extraction_bar: None,
            coverage_bar: None,
        }
    }

    /// Begin tracking extraction over `image_count` images
    pub fn start_extraction(&mut self, image_count: usize) {
        let bar = ProgressBar::new(image_count as u64);
        bar.set_style(EXTRACTION_STYLE.clone());
        self.extraction_bar = Some(self.multi_progress.add(bar));
    }

    /// Record that `path` contributed `patch_count` patches
    pub fn image_extracted(&self, path: &Path, patch_count: usize) {
        if let Some(ref bar) = self.extraction_bar {
            let display_name = path.file_name().unwrap_or_default().to_string_lossy();
            bar.set_message(format!("{display_name}: {patch_count} patches"));
            bar.inc(1);
        }
    }

    /// Remove the extraction bar
    pub fn finish_extraction(&mut self) {
        if let Some(bar) = self.extraction_bar.take() {
            bar.finish_and_clear();
            self.multi_progress.remove(&bar);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        self.finish_extraction();
        if let Some(bar) = self.coverage_bar.take() {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}

impl<T: Channel> AssemblyObserver<T> for ProgressManager {
    fn attempt_started(&mut self, attempt: usize, canvas: &Canvas<T>) {
        if let Some(bar) = self.coverage_bar.take() {
            bar.finish_and_clear();
            self.multi_progress.remove(&bar);
        }
        let area = canvas.area() as u64;
        let bar = ProgressBar::new(area);
        bar.set_style(COVERAGE_STYLE.clone());
        bar.set_prefix(format!("Collage {attempt:>3}"));
        bar.set_message(format!("0/{area} px"));
        self.coverage_bar = Some(self.multi_progress.add(bar));
    }

    fn step_completed(&mut self, report: &StepReport, canvas: &Canvas<T>) {
        if let Some(ref bar) = self.coverage_bar {
            let area = canvas.area() as u64;
            let covered = area.saturating_sub(report.remaining as u64);
            let width = area.to_string().len();
            bar.set_position(covered);
            bar.set_message(format!("{covered:>width$}/{area} px"));
        }
    }

    fn attempt_completed(&mut self, _attempt: usize, steps: usize) {
        if let Some(ref bar) = self.coverage_bar {
            bar.finish_with_message(format!("done in {steps} placements"));
        }
    }
}
