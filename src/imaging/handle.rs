//! The [`Image`] handle.
//!
//! An `Image` owns exactly one decoded raster. It is released when dropped,
//! and the scoped entry points ([`Image::resize`], [`Image::thumbnail`],
//! [`Lighttable::with_image`](super::Lighttable::with_image), …) only ever
//! lend it to the caller's closure as `&Image`. The borrow checker therefore
//! rejects any use of a handle after its scope ends; there is no runtime
//! "released" state to check.
//!
//! Derived handles (resize, thumbnail, crop) get their own raster and inherit
//! the source format and [`ImageOptions`]; the source is never modified.

use super::calculations::{calculate_centered_square, calculate_thumbnail_dimensions};
use super::codec;
use super::error::{ImagingError, Result};
use super::format::Format;
use super::params::{CropRect, ImageOptions, ResizeRequest};
use super::resize;
use image::DynamicImage;
use std::fmt;
use std::path::Path;

pub struct Image {
    raster: DynamicImage,
    format: Option<Format>,
    options: ImageOptions,
}

impl Image {
    /// Wrap pixels already in memory. The handle has no source format.
    pub fn from_raster(raster: DynamicImage) -> Result<Self> {
        Self::build(raster, None, ImageOptions::default())
    }

    /// Open a file with explicit options.
    pub fn open(path: &Path, options: ImageOptions) -> Result<Self> {
        let decoded = codec::decode_from_path(path, options.auto_orient)?;
        Self::build(decoded.raster, Some(decoded.format), options)
    }

    /// Decode an in-memory buffer with explicit options.
    pub fn from_memory(bytes: &[u8], options: ImageOptions) -> Result<Self> {
        let decoded = codec::decode_from_memory(bytes, options.auto_orient)?;
        Self::build(decoded.raster, Some(decoded.format), options)
    }

    fn build(raster: DynamicImage, format: Option<Format>, options: ImageOptions) -> Result<Self> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(ImagingError::InvalidDimension {
                width: raster.width() as f64,
                height: raster.height() as f64,
            });
        }
        Ok(Self {
            raster,
            format,
            options,
        })
    }

    fn derive(&self, raster: DynamicImage) -> Result<Self> {
        Self::build(raster, self.format, self.options)
    }

    /// Replace the options this handle (and anything derived from it) uses.
    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Format the image was decoded from, inherited by derived handles.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn options(&self) -> &ImageOptions {
        &self.options
    }

    /// The decoded, upright pixels.
    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    /// Give up the handle and keep its pixels.
    pub fn into_raster(mut self) -> DynamicImage {
        std::mem::replace(&mut self.raster, DynamicImage::new_luma8(0, 0))
    }

    // -----------------------------------------------------------------------
    // Persisting
    // -----------------------------------------------------------------------

    /// Encode in the format implied by `path`'s extension and write it.
    ///
    /// The format is resolved and the bytes fully encoded before the file is
    /// touched; an unsupported extension creates nothing.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let bytes = codec::encode(&self.raster, format, &self.options.encode)?;
        codec::write_to_path(&bytes, path)
    }

    /// Encode in the format the image was decoded from.
    pub fn buffer(&self) -> Result<Vec<u8>> {
        let format = self.format.ok_or_else(|| {
            ImagingError::UnsupportedFormat("image has no source format; name one".into())
        })?;
        self.encode(format)
    }

    /// Encode in the format named by `target`: a path (`out/pix.png`), a
    /// dotted extension (`.jpg`) or a bare one (`jpg`).
    ///
    /// The result equals the bytes [`save`](Self::save) writes for the same
    /// format.
    pub fn buffer_as(&self, target: &str) -> Result<Vec<u8>> {
        self.encode(Format::from_target(target)?)
    }

    pub fn encode(&self, format: Format) -> Result<Vec<u8>> {
        codec::encode(&self.raster, format, &self.options.encode)
    }

    // -----------------------------------------------------------------------
    // Owned transforms
    // -----------------------------------------------------------------------

    /// Resample to exactly `width` x `height` (truncated toward zero).
    ///
    /// Dimensions below 1 fail with [`ImagingError::InvalidDimension`] and
    /// targets over the allocation budget with [`ImagingError::TooLarge`],
    /// both before any pixel work.
    pub fn resized(&self, width: impl Into<f64>, height: impl Into<f64>) -> Result<Image> {
        let request = ResizeRequest::new(width.into(), height.into())?;
        resize::check_budget(&self.raster, request, self.options.max_alloc)?;
        self.derive(resize::resample(&self.raster, request, self.options.filter))
    }

    /// Resize so the longer edge equals `max_edge`, keeping the aspect ratio.
    pub fn thumbnailed(&self, max_edge: u32) -> Result<Image> {
        if max_edge == 0 {
            return Err(ImagingError::InvalidDimension {
                width: 0.0,
                height: 0.0,
            });
        }
        let (width, height) = calculate_thumbnail_dimensions(self.dimensions(), max_edge);
        self.resized(width, height)
    }

    /// Copy the region `left..right` x `top..bottom` (right/bottom exclusive).
    pub fn cropped(&self, left: u32, top: u32, right: u32, bottom: u32) -> Result<Image> {
        let rect = CropRect::new(left, top, right, bottom, self.dimensions())?;
        self.derive(resize::crop(&self.raster, rect))
    }

    /// Crop the centered square, then thumbnail it to `size` x `size`.
    pub fn cropped_thumbnailed(&self, size: u32) -> Result<Image> {
        if size == 0 {
            return Err(ImagingError::InvalidDimension {
                width: 0.0,
                height: 0.0,
            });
        }
        let (left, top, right, bottom) = calculate_centered_square(self.dimensions());
        self.cropped(left, top, right, bottom)?.thumbnailed(size)
    }

    // -----------------------------------------------------------------------
    // Scoped transforms
    // -----------------------------------------------------------------------
    //
    // The closure may fail with its own error type; imaging failures convert
    // into it through `From<ImagingError>`.

    /// Scoped [`resized`](Self::resized): the new handle lives for the
    /// duration of `f` and is released however `f` exits. `f` never runs if
    /// the dimensions are rejected.
    pub fn resize<R, E: From<ImagingError>>(
        &self,
        width: impl Into<f64>,
        height: impl Into<f64>,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let resized = self.resized(width, height)?;
        f(&resized)
    }

    /// Scoped [`thumbnailed`](Self::thumbnailed).
    pub fn thumbnail<R, E: From<ImagingError>>(
        &self,
        max_edge: u32,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let thumb = self.thumbnailed(max_edge)?;
        f(&thumb)
    }

    /// Scoped [`cropped`](Self::cropped).
    pub fn with_crop<R, E: From<ImagingError>>(
        &self,
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let cropped = self.cropped(left, top, right, bottom)?;
        f(&cropped)
    }

    /// Scoped [`cropped_thumbnailed`](Self::cropped_thumbnailed).
    pub fn cropped_thumbnail<R, E: From<ImagingError>>(
        &self,
        size: u32,
        f: impl FnOnce(&Image) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let thumb = self.cropped_thumbnailed(size)?;
        f(&thumb)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.raster.color())
            .field("format", &self.format)
            .finish()
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        // Zero-sized only after into_raster handed the pixels away
        if self.width() > 0 {
            log::trace!("releasing {}x{} image", self.width(), self.height());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, png_bytes};
    use tempfile::TempDir;

    fn pix() -> Image {
        Image::from_memory(&png_bytes(50, 50), ImageOptions::default()).unwrap()
    }

    #[test]
    fn from_raster_rejects_empty() {
        let result = Image::from_raster(DynamicImage::new_rgb8(0, 5));
        assert!(matches!(result, Err(ImagingError::InvalidDimension { .. })));
    }

    #[test]
    fn from_raster_has_no_format() {
        let img = Image::from_raster(gradient(4, 4)).unwrap();
        assert_eq!(img.format(), None);
        assert!(matches!(img.buffer(), Err(ImagingError::UnsupportedFormat(_))));
        assert!(img.buffer_as("png").is_ok());
    }

    #[test]
    fn resized_leaves_source_untouched() {
        let img = pix();
        let small = img.resized(25, 10).unwrap();
        assert_eq!(small.dimensions(), (25, 10));
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(small.format(), Some(Format::Png));
    }

    #[test]
    fn resized_truncates_fractions() {
        assert_eq!(pix().resized(25.2, 25.7).unwrap().dimensions(), (25, 25));
    }

    #[test]
    fn resized_rejects_bad_dimensions() {
        let img = pix();
        for (w, h) in [(0, 25), (25, 0), (-25, 25), (25, -25)] {
            assert!(matches!(
                img.resized(w, h),
                Err(ImagingError::InvalidDimension { .. })
            ));
        }
    }

    #[test]
    fn scoped_resize_skips_block_on_invalid_dimensions() {
        let mut ran = false;
        let result: Result<()> = pix().resize(0, 25, |_| {
            ran = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!ran);
    }

    #[test]
    fn thumbnail_fits_longer_edge() {
        let img = Image::from_raster(gradient(80, 60)).unwrap();
        let dims = img
            .thumbnail(40, |t| Ok::<_, ImagingError>(t.dimensions()))
            .unwrap();
        assert_eq!(dims, (40, 30));
    }

    #[test]
    fn thumbnail_zero_is_invalid() {
        assert!(matches!(
            pix().thumbnailed(0),
            Err(ImagingError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn with_crop_yields_region() {
        let img = pix();
        let dims = img
            .with_crop(10, 5, 30, 45, |c| Ok::<_, ImagingError>(c.dimensions()))
            .unwrap();
        assert_eq!(dims, (20, 40));
    }

    #[test]
    fn with_crop_rejects_out_of_bounds() {
        let result: Result<()> = pix().with_crop(0, 0, 51, 50, |_| Ok(()));
        assert!(matches!(result, Err(ImagingError::InvalidCrop { .. })));
    }

    #[test]
    fn cropped_thumbnail_is_square() {
        let img = Image::from_raster(gradient(80, 50)).unwrap();
        let dims = img
            .cropped_thumbnail(20, |t| Ok::<_, ImagingError>(t.dimensions()))
            .unwrap();
        assert_eq!(dims, (20, 20));
    }

    #[test]
    fn nested_scopes_keep_outer_handle_valid() {
        let img = pix();
        let result: Result<()> = img.resize(10, 10, |a| {
            a.resize(5, 5, |b| {
                assert_eq!(b.dimensions(), (5, 5));
                Ok::<_, ImagingError>(())
            })?;
            assert_eq!(a.dimensions(), (10, 10));
            Ok(())
        });
        result.unwrap();
        assert_eq!(img.dimensions(), (50, 50));
    }

    #[derive(Debug)]
    enum AlbumError {
        Imaging(ImagingError),
        Rejected(&'static str),
    }

    impl From<ImagingError> for AlbumError {
        fn from(e: ImagingError) -> Self {
            Self::Imaging(e)
        }
    }

    #[test]
    fn block_fails_with_its_own_error_type() {
        let img = pix();
        let rejected = img.thumbnail(10, |_| -> std::result::Result<(), AlbumError> {
            Err(AlbumError::Rejected("too dark"))
        });
        assert!(matches!(rejected, Err(AlbumError::Rejected("too dark"))));

        let invalid = img.resize(0, 10, |_| Ok::<_, AlbumError>(()));
        assert!(matches!(
            invalid,
            Err(AlbumError::Imaging(ImagingError::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn huge_resize_is_rejected_before_allocating() {
        let img = pix();
        let mut ran = false;
        let result: Result<()> = img.resize(4e9, 4e9, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(ImagingError::TooLarge { .. })));
        assert!(!ran);
        assert!(matches!(
            img.thumbnailed(u32::MAX),
            Err(ImagingError::TooLarge { .. })
        ));
    }

    #[test]
    fn alloc_budget_comes_from_options() {
        let img = pix().with_options(ImageOptions {
            max_alloc: 1024,
            ..ImageOptions::default()
        });
        // 50 source columns x 30 rows x 16 bytes of intermediate
        assert!(matches!(
            img.resized(30, 30),
            Err(ImagingError::TooLarge { limit: 1024, .. })
        ));
        assert_eq!(img.resized(2, 1).unwrap().dimensions(), (2, 1));
    }

    #[test]
    fn save_unsupported_extension_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        assert!(pix().save(&path).is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn buffer_as_matches_saved_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        let img = pix();
        img.save(&path).unwrap();
        assert_eq!(img.buffer_as(".jpg").unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn with_options_flows_to_derived_handles() {
        let mut options = ImageOptions::default();
        options.encode.jpeg_quality = crate::imaging::Quality::new(40);
        let img = pix().with_options(options);
        let thumb = img.thumbnailed(10).unwrap();
        assert_eq!(thumb.options().encode.jpeg_quality.value(), 40);
    }

    #[test]
    fn into_raster_returns_pixels() {
        let raster = pix().into_raster();
        assert_eq!((raster.width(), raster.height()), (50, 50));
    }
}
