//! Pipeline constants and runtime configuration defaults

// Segmentation defaults
/// Target number of clusters per source image
pub const DEFAULT_SEGMENTS: usize = 10;
/// Weight of spatial distance against color distance during clustering
pub const DEFAULT_COMPACTNESS: f32 = 25.0;
/// Upper bound on clustering iterations
pub const DEFAULT_SEGMENTATION_ITERATIONS: usize = 10;
/// Gaussian pre-smoothing applied before clustering
pub const DEFAULT_SIGMA: f32 = 20.0;
/// Fragments smaller than this fraction of the mean segment area are merged away
pub const MIN_SEGMENT_SIZE_FACTOR: f32 = 0.5;

// Source images are scaled so their shorter side matches this length
/// Shorter side of every resized source image, in pixels
pub const SOURCE_MIN_DIMENSION: u32 = 1500;

// Canvas settings
/// Canvas height in pixels
pub const CANVAS_ROWS: usize = 1000;
/// Canvas width in pixels
pub const CANVAS_COLS: usize = 1000;

// Input discovery and output settings
/// Case-sensitive extensions accepted as source images
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
/// File name of every finished collage
pub const OUTPUT_FILE_NAME: &str = "collage.jpg";

// Progress bar display settings
/// Coverage bar refreshes are limited to this many per second
pub const PROGRESS_REFRESH_HZ: u8 = 10;
