//! Error types for patch extraction and collage assembly

use std::fmt;
use std::path::PathBuf;

/// Main error type for all collage operations
#[derive(Debug)]
pub enum CollageError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a finished collage to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Source data doesn't meet pipeline requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Directory scan found no decodable image files
    NoInputImages {
        /// Directory that was scanned
        directory: PathBuf,
    },

    /// Assembly was requested without any patch to place
    EmptyPatchPool,

    /// Bounding box requested for an image with no foreground pixel
    EmptyMask {
        /// Dimensions of the rejected image (rows, cols)
        dimensions: (usize, usize),
    },

    /// The external viewer could not be run or reported failure
    Display {
        /// Viewer program
        program: String,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for CollageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NoInputImages { directory } => {
                write!(
                    f,
                    "No .jpg, .jpeg or .png images found in '{}'",
                    directory.display()
                )
            }
            Self::EmptyPatchPool => {
                write!(f, "Patch pool is empty, nothing can be assembled")
            }
            Self::EmptyMask { dimensions } => {
                write!(
                    f,
                    "Image of size {}x{} has no foreground pixel to bound",
                    dimensions.0, dimensions.1
                )
            }
            Self::Display { program, reason } => {
                write!(f, "Viewer '{program}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for CollageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for collage results
pub type Result<T> = std::result::Result<T, CollageError>;

impl From<image::ImageError> for CollageError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for CollageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> CollageError {
    CollageError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> CollageError {
    CollageError::InvalidSourceData {
        reason: reason.to_string(),
    }
}
