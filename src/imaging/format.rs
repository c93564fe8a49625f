//! Image formats the codec adapter knows about.
//!
//! Decoding is driven by content sniffing ([`Format::sniff`]); encoding is
//! driven by an extension ([`Format::from_extension`] / [`Format::from_target`]).
//!
//! | Format | Decode | Encode |
//! |---|---|---|
//! | PNG | yes | yes |
//! | JPEG | yes | yes |
//! | TIFF | yes | yes |
//! | WebP | yes | yes (lossless) |
//! | AVIF | no | yes |
//!
//! AVIF decoding is absent because the `image` crate's `"avif"` feature only
//! enables the rav1e encoder.

use super::error::{ImagingError, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Png,
    Jpeg,
    Tiff,
    WebP,
    Avif,
}

const EXTENSIONS: &[(&str, Format)] = &[
    ("png", Format::Png),
    ("jpg", Format::Jpeg),
    ("jpeg", Format::Jpeg),
    ("tif", Format::Tiff),
    ("tiff", Format::Tiff),
    ("webp", Format::WebP),
    ("avif", Format::Avif),
];

impl Format {
    /// Look up a format by file extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }

    /// Resolve the format named by a `buffer`/`save` target.
    ///
    /// Accepts a path (`out/pix.png`), a dotted extension (`.jpg`) or a bare
    /// extension (`jpg`). Only the last path component is considered.
    pub fn from_target(target: &str) -> Result<Self> {
        let name = Path::new(target)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(target);
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => name,
        };
        Self::from_extension(ext).ok_or_else(|| {
            ImagingError::UnsupportedFormat(format!("no encoder for extension {ext:?}"))
        })
    }

    /// Resolve the format implied by a destination path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ImagingError::UnsupportedFormat(format!("{} has no extension", path.display()))
        })?;
        Self::from_extension(ext).ok_or_else(|| {
            ImagingError::UnsupportedFormat(format!("no encoder for extension {ext:?}"))
        })
    }

    /// Identify the format of encoded bytes from their header.
    ///
    /// Fails with [`ImagingError::NotAnImage`] for empty input, unknown headers,
    /// and formats recognized by the `image` crate but not decodable here.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ImagingError::NotAnImage("empty input".into()));
        }
        let guessed = image::guess_format(bytes)
            .map_err(|_| ImagingError::NotAnImage("unrecognized header".into()))?;
        match Self::from_image_format(guessed) {
            Some(format) if format.can_decode() => Ok(format),
            _ => Err(ImagingError::NotAnImage(format!(
                "unsupported image format {guessed:?}"
            ))),
        }
    }

    fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            image::ImageFormat::WebP => Some(Self::WebP),
            image::ImageFormat::Avif => Some(Self::Avif),
            _ => None,
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Tiff => image::ImageFormat::Tiff,
            Self::WebP => image::ImageFormat::WebP,
            Self::Avif => image::ImageFormat::Avif,
        }
    }

    /// Whether a decoder for this format is compiled in.
    pub fn can_decode(self) -> bool {
        !matches!(self, Self::Avif) && self.to_image_format().reading_enabled()
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Tiff => "tif",
            Self::WebP => "webp",
            Self::Avif => "avif",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Tiff => "TIFF",
            Self::WebP => "WebP",
            Self::Avif => "AVIF",
        };
        f.write_str(name)
    }
}

/// File extensions whose decoders are compiled in.
pub fn supported_input_extensions() -> Vec<&'static str> {
    EXTENSIONS
        .iter()
        .filter(|(_, format)| format.can_decode())
        .map(|(ext, _)| *ext)
        .collect()
}

/// Whether `path` has an extension this crate can decode.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
        .is_some_and(Format::can_decode)
}
