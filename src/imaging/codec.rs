//! Codec adapter over the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` |
//! | Decode | `ImageReader::with_format` + `DynamicImage::from_decoder` |
//! | Orientation | `ImageDecoder::orientation` + [`orientation::normalize`] |
//! | Encode PNG / TIFF | `PngEncoder` / `TiffEncoder` |
//! | Encode JPEG | `JpegEncoder` (quality from [`EncodeOptions`]) |
//! | Encode WebP | `WebPEncoder::new_lossless` |
//! | Encode AVIF | `AvifEncoder` (rav1e) |
//! | Write | `tempfile::NamedTempFile` in the destination dir, then rename |
//!
//! Path decoding reads the whole file and goes through the same path as
//! memory decoding, so both entry points behave identically.

use super::error::{ImagingError, Result};
use super::format::Format;
use super::orientation::{self, Orientation};
use super::params::EncodeOptions;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageReader};
use std::io::{Cursor, Write};
use std::path::Path;

/// A decoded, upright raster plus the format it came from.
#[derive(Debug)]
pub struct Decoded {
    pub raster: DynamicImage,
    pub format: Format,
}

/// Read and decode an image file.
///
/// A missing file is [`ImagingError::PathNotFound`]; an existing file that is
/// not an image is [`ImagingError::NotAnImage`].
pub fn decode_from_path(path: &Path, auto_orient: bool) -> Result<Decoded> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ImagingError::PathNotFound(path.to_path_buf()),
        _ => ImagingError::Io(e),
    })?;
    decode_from_memory(&bytes, auto_orient).map_err(|e| match e {
        ImagingError::NotAnImage(reason) => {
            ImagingError::NotAnImage(format!("{}: {reason}", path.display()))
        }
        other => other,
    })
}

/// Decode an image held in memory.
pub fn decode_from_memory(bytes: &[u8], auto_orient: bool) -> Result<Decoded> {
    let format = Format::sniff(bytes)?;
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .into_decoder()
        .map_err(ImagingError::Decode)?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::NotAnImage(format!(
            "{format} image with empty dimensions"
        )));
    }
    // Metadata has to be read before the decoder is consumed by the pixels
    let orientation = if auto_orient {
        orientation::read(&mut decoder)
    } else {
        Orientation::NoTransforms
    };
    let mut raster = DynamicImage::from_decoder(decoder).map_err(ImagingError::Decode)?;
    orientation::normalize(&mut raster, orientation);
    log::debug!(
        "decoded {format} image {}x{} ({} bytes)",
        raster.width(),
        raster.height(),
        bytes.len()
    );
    Ok(Decoded { raster, format })
}

/// Serialize a raster into `format`.
///
/// Pixel conversions needed by an encoder are made on a temporary copy; the
/// input raster is never modified.
pub fn encode(raster: &DynamicImage, format: Format, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let result = match format {
        Format::Png => png_compatible(raster).write_with_encoder(PngEncoder::new(&mut out)),
        Format::Jpeg => DynamicImage::ImageRgb8(raster.to_rgb8()).write_with_encoder(
            JpegEncoder::new_with_quality(&mut out, options.jpeg_quality.value()),
        ),
        Format::Tiff => tiff_compatible(raster)
            .write_with_encoder(TiffEncoder::new(Cursor::new(&mut out))),
        Format::WebP => eight_bit(raster).write_with_encoder(WebPEncoder::new_lossless(&mut out)),
        Format::Avif => eight_bit(raster).write_with_encoder(AvifEncoder::new_with_speed_quality(
            &mut out,
            options.avif_speed,
            options.avif_quality.value(),
        )),
    };
    result.map_err(ImagingError::Encode)?;
    Ok(out)
}

/// Write already-encoded bytes to `path`.
///
/// The bytes go to a temporary file in the destination directory that is
/// renamed over `path` only once fully written.
pub fn write_to_path(bytes: &[u8], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(path).map_err(|e| ImagingError::Io(e.error))?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Encoder pixel-layout adaptation
// ---------------------------------------------------------------------------

/// PNG takes 8/16-bit L, LA, RGB, RGBA; float rasters drop to 16-bit.
fn png_compatible(raster: &DynamicImage) -> std::borrow::Cow<'_, DynamicImage> {
    use std::borrow::Cow;
    match raster.color() {
        ColorType::Rgb32F => Cow::Owned(DynamicImage::ImageRgb16(raster.to_rgb16())),
        ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(raster.to_rgba16())),
        _ => Cow::Borrowed(raster),
    }
}

/// TIFF has no gray+alpha layouts.
fn tiff_compatible(raster: &DynamicImage) -> std::borrow::Cow<'_, DynamicImage> {
    use std::borrow::Cow;
    match raster.color() {
        ColorType::La8 => Cow::Owned(DynamicImage::ImageRgba8(raster.to_rgba8())),
        ColorType::La16 => Cow::Owned(DynamicImage::ImageRgba16(raster.to_rgba16())),
        _ => Cow::Borrowed(raster),
    }
}

/// WebP and AVIF take 8-bit RGB or RGBA.
fn eight_bit(raster: &DynamicImage) -> std::borrow::Cow<'_, DynamicImage> {
    use std::borrow::Cow;
    match raster.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(raster),
        color if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(raster.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(raster.to_rgb8())),
    }
}
