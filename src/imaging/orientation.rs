//! Orientation normalizer.
//!
//! Runs exactly once per decode: the decoder reports the EXIF orientation
//! and the matching rotate/flip is applied, so every later width/height read
//! and every resample sees the upright image.

use image::{DynamicImage, ImageDecoder};

pub use image::metadata::Orientation;

/// Orientation the decoder found in the image metadata.
///
/// Absent or unreadable metadata means the pixels are already upright.
pub fn read(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable orientation metadata: {e}");
        Orientation::NoTransforms
    })
}

/// Whether correcting `orientation` exchanges width and height.
pub fn swaps_dimensions(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Turn a freshly decoded raster upright in place.
pub fn normalize(raster: &mut DynamicImage, orientation: Orientation) {
    if orientation == Orientation::NoTransforms {
        return;
    }
    log::debug!(
        "correcting orientation {orientation:?} of {}x{} image",
        raster.width(),
        raster.height()
    );
    raster.apply_orientation(orientation);
}
