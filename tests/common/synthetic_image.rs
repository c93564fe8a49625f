use super::fixtures::{jpeg_bytes, with_jpeg_exif};
use image::DynamicImage;
use std::path::Path;

/// A JPEG whose APP1 segment carries the given EXIF orientation.
///
/// The stored pixels are `width` x `height`; orientations 5 through 8 display
/// transposed.
pub fn oriented_jpeg(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    with_jpeg_exif(&jpeg_bytes(width, height), orientation)
}

pub fn write(path: &Path, bytes: &[u8]) {
    std::fs::write(path, bytes).unwrap();
}

/// Dimensions of an encoded file, read back independently of lighttable.
pub fn file_dimensions(path: &Path) -> (u32, u32) {
    let img: DynamicImage = image::open(path).unwrap();
    (img.width(), img.height())
}
