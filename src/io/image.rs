//! Source image discovery, decoding, resizing and collage export

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array3;

use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{CollageError, Result, invalid_source};
use crate::spatial::canvas::Canvas;
use crate::spatial::raster::{Channel, Raster};

/// Test whether `path` has one of the accepted extensions, case-sensitively
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// List the image files directly inside `directory`, sorted by path
///
/// Subdirectories are not searched. `exclude` removes one file, typically
/// the collage output, from the listing.
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be read.
pub fn discover_images(directory: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let read_error = |source| CollageError::FileSystem {
        path: directory.to_path_buf(),
        operation: "read directory",
        source,
    };

    let excluded_name = exclude.and_then(Path::file_name);
    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }
        if excluded_name.is_some() && path.file_name() == excluded_name {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Decode an image file as 8-bit RGB
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|e| CollageError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgb8())
}

/// Dimensions `(width, height)` after scaling so the shorter side equals `min_dimension`
pub fn scaled_dimensions(width: u32, height: u32, min_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = |side: u32, shorter: u32| {
        let scaled = u64::from(side) * u64::from(min_dimension) / u64::from(shorter);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };
    if height <= width {
        (scale(width, height), min_dimension)
    } else {
        (min_dimension, scale(height, width))
    }
}

/// Resize preserving the aspect ratio so the shorter side equals `min_dimension`
pub fn resize_to_min_dimension(img: &RgbImage, min_dimension: u32) -> RgbImage {
    let (width, height) = scaled_dimensions(img.width(), img.height(), min_dimension);
    if (width, height) == img.dimensions() {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Convert an RGB image into a `(rows, cols, 3)` raster
///
/// # Errors
///
/// Returns `InvalidSourceData` if the pixel buffer does not match the
/// reported dimensions.
pub fn rgb_to_raster(img: RgbImage) -> Result<Raster<u8>> {
    let shape = (img.height() as usize, img.width() as usize, 3);
    Array3::from_shape_vec(shape, img.into_raw())
        .map_err(|e| invalid_source(&format!("pixel buffer does not match image size: {e}")))
}

/// Load, resize and convert one source image
///
/// # Errors
///
/// Propagates decoding and conversion errors.
pub fn load_source(path: &Path, min_dimension: u32) -> Result<Raster<u8>> {
    let img = load_rgb(path)?;
    rgb_to_raster(resize_to_min_dimension(&img, min_dimension))
}

/// Flatten a canvas to RGB for formats without alpha
pub fn canvas_to_rgb<T: Channel>(canvas: &Canvas<T>) -> RgbImage {
    let pixels = canvas.pixels();
    RgbImage::from_fn(canvas.cols() as u32, canvas.rows() as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        let channel = |c: usize| {
            pixels
                .get([row, col, c])
                .map_or(0, |value| u8::from_unit(value.to_unit()))
        };
        Rgb([channel(0), channel(1), channel(2)])
    })
}

/// Write a canvas to `output_path`; the format follows the extension
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or saved to the specified path
pub fn save_canvas<T: Channel>(canvas: &Canvas<T>, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CollageError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    canvas_to_rgb(canvas)
        .save(output_path)
        .map_err(|e| CollageError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
