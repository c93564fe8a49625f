//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader::with_format`, format sniffed from content |
//! | **Orientation** | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | **Resize** | `image::imageops` separable filters, Lanczos3 by default |
//! | **Encode** | PNG, JPEG, TIFF, WebP (lossless), AVIF (rav1e) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Codec / Orientation / Resize**: the pixel and byte work
//! - **Handle**: [`Image`], one owned raster with save/buffer/transform methods
//! - **Scope**: [`Lighttable`] and the `with_image*` entry points

mod calculations;
pub mod codec;
mod error;
pub mod format;
mod handle;
pub mod orientation;
mod params;
pub mod resize;
mod scope;

pub use calculations::{
    calculate_centered_square, calculate_thumbnail_dimensions, resolve_dimension,
};
pub use error::{ImagingError, Result};
pub use format::{Format, is_supported_input, supported_input_extensions};
pub use handle::Image;
pub use orientation::Orientation;
pub use params::{
    CropRect, EncodeOptions, ImageOptions, Quality, ResampleFilter, ResizeRequest,
};
pub use scope::{ImageSource, Lighttable, with_image, with_image_from_memory};
