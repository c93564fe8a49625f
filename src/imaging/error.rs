//! Error taxonomy for every imaging operation.
//!
//! Callers can tell these situations apart:
//!
//! | Variant | Meaning |
//! |---|---|
//! | [`ImagingError::PathNotFound`] | the source file does not exist |
//! | [`ImagingError::NotAnImage`] | empty input, or a header no decoder recognizes |
//! | [`ImagingError::InvalidDimension`] / [`ImagingError::InvalidCrop`] | rejected before any pixel work or file I/O |
//! | [`ImagingError::TooLarge`] | a resize target whose buffers exceed the allocation budget |
//! | [`ImagingError::Decode`] / [`ImagingError::Encode`] | the codec rejected the data; never retried |

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("No such file: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Invalid dimensions {width}x{height}: both must be at least 1 after truncation")]
    InvalidDimension { width: f64, height: f64 },
    #[error("Invalid crop ({left}, {top})-({right}, {bottom}) for a {width}x{height} image")]
    InvalidCrop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        width: u32,
        height: u32,
    },
    #[error("Resize to {width}x{height} needs {bytes} bytes, over the {limit}-byte limit")]
    TooLarge {
        width: u32,
        height: u32,
        bytes: u64,
        limit: u64,
    },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Decode failed: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;
