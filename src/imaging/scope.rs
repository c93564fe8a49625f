//! Scoped lifecycle: open an image, lend it to a closure, release it.
//!
//! ```no_run
//! use lighttable::{Lighttable, config::Config};
//!
//! let lighttable = Lighttable::new(&Config::default());
//! lighttable.with_image("photo.jpg", |img| {
//!     img.thumbnail(128, |thumb| thumb.save("photo_thumb.png"))
//! })?;
//! # Ok::<(), lighttable::ImagingError>(())
//! ```
//!
//! The closure receives `&Image`, so the handle cannot outlive the call. It
//! is dropped exactly once when the call returns, whether the closure
//! returned `Ok`, returned `Err`, or panicked. If opening fails the closure
//! never runs.

use super::error::{ImagingError, Result};
use super::handle::Image;
use super::params::ImageOptions;
use crate::config::Config;
use std::path::Path;

/// Where an image comes from. Paths and byte buffers are separate variants;
/// there is no guessing which one a value is.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    Memory(&'a [u8]),
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a std::path::PathBuf> for ImageSource<'a> {
    fn from(path: &'a std::path::PathBuf) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Memory(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Memory(bytes)
    }
}

/// Entry point configured once, explicitly, from a [`Config`].
///
/// Every handle it opens carries the resulting [`ImageOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Lighttable {
    options: ImageOptions,
}

impl Lighttable {
    pub fn new(config: &Config) -> Self {
        Self {
            options: ImageOptions::from_config(config),
        }
    }

    pub fn with_options(options: ImageOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImageOptions {
        &self.options
    }

    /// Open an image as an owned handle, released when dropped.
    pub fn open<'a>(&self, source: impl Into<ImageSource<'a>>) -> Result<Image> {
        match source.into() {
            ImageSource::Path(path) => Image::open(path, self.options),
            ImageSource::Memory(bytes) => Image::from_memory(bytes, self.options),
        }
    }

    /// Open `source`, run `f` with the handle, release it.
    ///
    /// `f` may fail with any error that an [`ImagingError`] converts into.
    pub fn with_source<'a, R, E: From<ImagingError>>(
        &self,
        source: impl Into<ImageSource<'a>>,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let image = self.open(source)?;
        f(&image)
    }

    /// Scoped open from a file path.
    ///
    /// A missing file is [`PathNotFound`](super::ImagingError::PathNotFound);
    /// a file that is not an image is [`NotAnImage`](super::ImagingError::NotAnImage).
    pub fn with_image<R, E: From<ImagingError>>(
        &self,
        path: impl AsRef<Path>,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        self.with_source(ImageSource::Path(path.as_ref()), f)
    }

    /// Scoped open from encoded bytes; empty or unrecognized input is
    /// [`NotAnImage`](super::ImagingError::NotAnImage).
    pub fn with_image_from_memory<R, E: From<ImagingError>>(
        &self,
        bytes: &[u8],
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        self.with_source(ImageSource::Memory(bytes), f)
    }
}

/// [`Lighttable::with_image`] with stock settings.
pub fn with_image<R, E: From<ImagingError>>(
    path: impl AsRef<Path>,
    f: impl FnOnce(&Image) -> std::result::Result<R, E>,
) -> std::result::Result<R, E> {
    Lighttable::default().with_image(path, f)
}

/// [`Lighttable::with_image_from_memory`] with stock settings.
pub fn with_image_from_memory<R, E: From<ImagingError>>(
    bytes: &[u8],
    f: impl FnOnce(&Image) -> std::result::Result<R, E>,
) -> std::result::Result<R, E> {
    Lighttable::default().with_image_from_memory(bytes, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, png_bytes, with_jpeg_exif, write_png};
    use tempfile::TempDir;

    #[test]
    fn open_dispatches_on_source_variant() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pix.png");
        write_png(&path, 12, 7);
        let bytes = std::fs::read(&path).unwrap();

        let lighttable = Lighttable::default();
        assert_eq!(lighttable.open(&path).unwrap().dimensions(), (12, 7));
        assert_eq!(lighttable.open(&bytes).unwrap().dimensions(), (12, 7));
        assert_eq!(
            lighttable.open(ImageSource::Memory(&bytes)).unwrap().dimensions(),
            (12, 7)
        );
    }

    #[test]
    fn block_not_run_when_open_fails() {
        let mut ran = false;
        let result: Result<()> = with_image_from_memory(&[], |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(ImagingError::NotAnImage(_))));
        assert!(!ran);
    }

    #[test]
    fn missing_path_is_distinct_from_not_an_image() {
        let tmp = TempDir::new().unwrap();
        let missing: Result<()> = with_image(tmp.path().join("nope.png"), |_| Ok(()));
        assert!(matches!(missing, Err(ImagingError::PathNotFound(_))));

        let text = tmp.path().join("text.png");
        std::fs::write(&text, "hello").unwrap();
        let not_image: Result<()> = with_image(&text, |_| Ok(()));
        assert!(matches!(not_image, Err(ImagingError::NotAnImage(_))));
    }

    #[test]
    fn block_value_is_returned() {
        let dims: Result<_> = with_image_from_memory(&png_bytes(9, 4), |img| Ok(img.dimensions()));
        assert_eq!(dims.unwrap(), (9, 4));
    }

    #[derive(Debug)]
    enum UploadError {
        Imaging(ImagingError),
        TooSmall(u32),
    }

    impl From<ImagingError> for UploadError {
        fn from(e: ImagingError) -> Self {
            Self::Imaging(e)
        }
    }

    fn check_upload(bytes: &[u8]) -> std::result::Result<(u32, u32), UploadError> {
        with_image_from_memory(bytes, |img| {
            if img.width() < 10 {
                return Err(UploadError::TooSmall(img.width()));
            }
            Ok(img.dimensions())
        })
    }

    #[test]
    fn caller_error_type_flows_through() {
        assert_eq!(check_upload(&png_bytes(12, 3)).unwrap(), (12, 3));
        assert!(matches!(
            check_upload(&png_bytes(4, 4)),
            Err(UploadError::TooSmall(4))
        ));
        assert!(matches!(
            check_upload(b"plain text"),
            Err(UploadError::Imaging(ImagingError::NotAnImage(_)))
        ));
    }

    #[test]
    fn panic_in_block_propagates() {
        let bytes = png_bytes(4, 4);
        let result = std::panic::catch_unwind(|| {
            let _ = with_image_from_memory(&bytes, |_| -> Result<()> { panic!("boom") });
        });
        assert!(result.is_err());
    }

    #[test]
    fn config_disables_auto_orient() {
        let bytes = with_jpeg_exif(&jpeg_bytes(50, 38), 6);
        let mut config = Config::default();
        config.decoding.auto_orient = false;

        let raw: Result<_> =
            Lighttable::new(&config).with_image_from_memory(&bytes, |img| Ok(img.dimensions()));
        assert_eq!(raw.unwrap(), (50, 38));

        let upright: Result<_> = with_image_from_memory(&bytes, |img| Ok(img.dimensions()));
        assert_eq!(upright.unwrap(), (38, 50));
    }
}
