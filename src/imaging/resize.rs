//! Resize engine.
//!
//! Every operation here takes a borrowed source raster and returns a new,
//! independently owned raster. Validation lives in [`ResizeRequest`] and
//! [`CropRect`], so by the time these functions run the targets are known
//! to be non-empty.
//!
//! Resampling is `image::imageops::resize`, a separable convolution: one
//! horizontal pass then one vertical pass, each destination pixel a weighted
//! sum of the source neighborhood under the chosen [`ResampleFilter`] kernel
//! (Lanczos3 by default). Aspect ratio is never adjusted here.

use super::error::{ImagingError, Result};
use super::params::{CropRect, ResampleFilter, ResizeRequest};
use image::DynamicImage;

/// Bytes per pixel of the `Rgba<f32>` buffer the vertical pass writes.
const INTERMEDIATE_BYTES_PER_PIXEL: u64 = 16;

/// Largest buffer resampling `source` to `request` allocates: either the
/// output raster or the source-width x target-height intermediate.
pub fn resample_bytes(source: &DynamicImage, request: ResizeRequest) -> u64 {
    let output = u64::from(request.width)
        .saturating_mul(u64::from(request.height))
        .saturating_mul(u64::from(source.color().bytes_per_pixel()));
    let intermediate = u64::from(source.width())
        .saturating_mul(u64::from(request.height))
        .saturating_mul(INTERMEDIATE_BYTES_PER_PIXEL);
    output.max(intermediate)
}

/// Reject a resample whose buffers would exceed `limit` bytes.
///
/// Allocation failure aborts the process, so this must run before
/// [`resample`].
pub fn check_budget(source: &DynamicImage, request: ResizeRequest, limit: u64) -> Result<()> {
    let bytes = resample_bytes(source, request);
    if bytes > limit {
        return Err(ImagingError::TooLarge {
            width: request.width,
            height: request.height,
            bytes,
            limit,
        });
    }
    Ok(())
}

/// Resample `source` to exactly `request.width` x `request.height`.
pub fn resample(source: &DynamicImage, request: ResizeRequest, filter: ResampleFilter) -> DynamicImage {
    log::debug!(
        "resampling {}x{} -> {}x{} ({filter:?})",
        source.width(),
        source.height(),
        request.width,
        request.height
    );
    if (source.width(), source.height()) == (request.width, request.height) {
        return source.clone();
    }
    source.resize_exact(request.width, request.height, filter.to_filter_type())
}

/// Copy the pixels inside `rect` into a new raster.
pub fn crop(source: &DynamicImage, rect: CropRect) -> DynamicImage {
    log::debug!(
        "cropping {}x{} to ({}, {})-({}, {})",
        source.width(),
        source.height(),
        rect.left,
        rect.top,
        rect.right,
        rect.bottom
    );
    source.crop_imm(rect.left, rect.top, rect.width(), rect.height())
}
