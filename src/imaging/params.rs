//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`Image`](super::Image) handle (which decides what
//! to produce) and the [`resize`](super::resize) / [`codec`](super::codec)
//! modules (which do the pixel and byte work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`ResampleFilter`]: Resampling kernel used by every resize.
//! - [`EncodeOptions`]: Per-format encoder settings.
//! - [`ImageOptions`]: Everything a handle carries from the config it was opened with.
//! - [`ResizeRequest`]: Validated target dimensions.
//! - [`CropRect`]: Validated crop rectangle.

use super::calculations::resolve_dimension;
use super::error::{ImagingError, Result};
use crate::config::Config;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Resampling kernel, from fastest/blockiest to slowest/sharpest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Encoder settings for the lossy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: Quality,
    pub avif_quality: Quality,
    /// rav1e speed preset, 1 (slowest) to 10 (fastest).
    pub avif_speed: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::default(),
            avif_quality: Quality(80),
            avif_speed: 6,
        }
    }
}

/// Settings a handle carries for its whole life, inherited by derived handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub encode: EncodeOptions,
    pub filter: ResampleFilter,
    pub auto_orient: bool,
    /// Byte budget for any single resize buffer.
    pub max_alloc: u64,
}

const MIB: u64 = 1024 * 1024;

impl ImageOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            encode: EncodeOptions {
                jpeg_quality: Quality::new(config.encoding.jpeg_quality),
                avif_quality: Quality::new(config.encoding.avif_quality),
                avif_speed: config.encoding.avif_speed.clamp(1, 10) as u8,
            },
            filter: config.resize.filter,
            auto_orient: config.decoding.auto_orient,
            max_alloc: config.resize.max_alloc_mb.saturating_mul(MIB),
        }
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            encode: EncodeOptions::default(),
            filter: ResampleFilter::default(),
            auto_orient: true,
            max_alloc: 2048 * MIB,
        }
    }
}

/// Target dimensions for an exact resize, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
}

impl ResizeRequest {
    /// Truncate both values toward zero and validate them.
    ///
    /// `25.7` becomes `25`; anything resolving below 1 (or non-finite) fails
    /// with [`ImagingError::InvalidDimension`].
    pub fn new(width: f64, height: f64) -> Result<Self> {
        match (resolve_dimension(width), resolve_dimension(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(ImagingError::InvalidDimension { width, height }),
        }
    }
}

/// Crop rectangle with exclusive right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    /// Validate a rectangle against source dimensions.
    ///
    /// Requires `left < right <= width` and `top < bottom <= height`.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32, source: (u32, u32)) -> Result<Self> {
        let (width, height) = source;
        if left < right && right <= width && top < bottom && bottom <= height {
            Ok(Self {
                left,
                top,
                right,
                bottom,
            })
        } else {
            Err(ImagingError::InvalidCrop {
                left,
                top,
                right,
                bottom,
                width,
                height,
            })
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}
