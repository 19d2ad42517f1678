//! Command-line interface for building a patch pool and assembling collages

use crate::algorithm::assembly::{
    Assembler, AssemblyConfig, AssemblyObserver, NoopObserver, RunReport, StopCondition,
};
use crate::algorithm::extraction::PatchExtractor;
use crate::algorithm::placement::PlacementPolicy;
use crate::analysis::segmentation::{SegmentationConfig, SlicSegmenter};
use crate::io::configuration::{
    DEFAULT_COMPACTNESS, DEFAULT_SEGMENTS, OUTPUT_FILE_NAME, SOURCE_MIN_DIMENSION,
};
use crate::io::display::Viewer;
use crate::io::error::{CollageError, Result};
use crate::io::image::{discover_images, load_source};
use crate::io::output::FileSink;
use crate::io::progress::ProgressManager;
use crate::spatial::patch::PatchPool;
use clap::Parser;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "patchwork")]
#[command(
    author,
    version,
    about = "Cut photos into superpixel patches and assemble random collages"
)]
/// Command-line arguments for the collage tool
pub struct Cli {
    /// Directory holding the source images
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// Collage output file [default: DIRECTORY/collage.jpg]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Random seed for reproducible collages
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stop after this many completed collages
    #[arg(short = 'n', long)]
    pub attempts: Option<usize>,

    /// Stop after this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub time_limit: Option<u64>,

    /// How sampled pixels become patch positions
    #[arg(short, long, value_enum, default_value_t = PlacementPolicy::default())]
    pub placement: PlacementPolicy,

    /// Target number of patches per source image
    #[arg(short = 'k', long, default_value_t = DEFAULT_SEGMENTS)]
    pub segments: usize,

    /// Segment regularity; higher values give rounder patches
    #[arg(short, long, default_value_t = DEFAULT_COMPACTNESS)]
    pub compactness: f32,

    /// Program that displays every finished collage
    #[arg(long, value_name = "PROGRAM")]
    pub viewer: Option<String>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Path every finished collage is written to
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.directory.join(OUTPUT_FILE_NAME))
    }

    /// Segmentation parameters with the command-line overrides applied
    pub fn segmentation_config(&self) -> SegmentationConfig {
        SegmentationConfig {
            segments: self.segments,
            compactness: self.compactness,
            ..SegmentationConfig::default()
        }
    }

    /// Canvas configuration with the selected placement policy
    pub fn assembly_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            policy: self.placement,
            ..AssemblyConfig::default()
        }
    }

    /// Stop criteria from `--attempts` and `--time-limit`
    pub fn stop_condition(&self) -> StopCondition {
        let mut stop = StopCondition::unbounded();
        if let Some(attempts) = self.attempts {
            stop = stop.with_max_attempts(attempts);
        }
        if let Some(seconds) = self.time_limit {
            stop = stop.with_time_limit(Duration::from_secs(seconds));
        }
        stop
    }

    fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }
}

/// Runs the whole pipeline: discovery, extraction, then the assembly loop
pub struct CollageProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CollageProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Parsed arguments
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Extract patches from every source image and assemble collages until
    /// the stop condition fires
    ///
    /// Without `--attempts` or `--time-limit` this only returns on error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be read or holds no source image
    /// - A parameter is out of range
    /// - A source image cannot be decoded
    /// - Extraction yields no patch
    pub fn process(&mut self) -> Result<RunReport> {
        let output_path = self.cli.output_path();
        let files = discover_images(&self.cli.directory, Some(&output_path))?;
        if files.is_empty() {
            return Err(CollageError::NoInputImages {
                directory: self.cli.directory.clone(),
            });
        }

        let pool = self.build_pool(&files)?;
        let stop = self.cli.stop_condition();

        let mut sink = FileSink::new(output_path.clone());
        if let Some(program) = &self.cli.viewer {
            sink = sink.with_viewer(Viewer::new(program.as_str()));
        }

        let mut assembler = Assembler::new(&pool, self.cli.assembly_config(), self.cli.rng())?;
        let mut noop = NoopObserver;
        let observer: &mut dyn AssemblyObserver<u8> = match self.progress_manager.as_mut() {
            Some(pm) => pm,
            None => &mut noop,
        };
        let report = assembler.run(&stop, &mut sink, observer);

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(report)
    }

    fn build_pool(&mut self, files: &[PathBuf]) -> Result<PatchPool<u8>> {
        let start_time = Instant::now();
        let extractor = PatchExtractor::new(SlicSegmenter::new(self.cli.segmentation_config())?);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_extraction(files.len());
        }

        let progress = self.progress_manager.as_ref();
        let images = files
            .iter()
            .map(|path| load_source(path, SOURCE_MIN_DIMENSION));
        let pool = extractor.build_pool(images, |index, patch_count| {
            let Some(path) = files.get(index) else {
                return;
            };
            debug!("{}: {patch_count} patches", path.display());
            if let Some(pm) = progress {
                pm.image_extracted(path, patch_count);
            }
        })?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish_extraction();
        }

        info!("Loaded {} images", files.len());
        info!(
            "Extracted {} patches in {:.1?}",
            pool.len(),
            start_time.elapsed()
        );

        if pool.is_empty() {
            return Err(CollageError::EmptyPatchPool);
        }
        Ok(pool)
    }
}
