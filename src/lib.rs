//! # Lighttable
//!
//! Scoped image lifecycle: open an image from a path or a byte buffer, turn it
//! upright, resize or thumbnail it, save it or encode it to bytes, and release
//! every handle when its scope ends.
//!
//! # Lifecycle
//!
//! ```text
//! open      path | bytes  →  Image     (decode + EXIF auto-orient)
//! derive    Image         →  Image     (resize, thumbnail, crop)
//! output    Image         →  file | Vec<u8>
//! release   end of scope  →  raster freed
//! ```
//!
//! Handles are lent to closures as `&Image`. A closure cannot keep the handle
//! past its call, so "use after release" does not compile, and the raster is
//! freed exactly once whether the closure returns `Ok`, returns `Err`, or
//! panics. Derived handles (a resized copy, a thumbnail) get their own scope
//! and are freed before the parent.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, orientation, resize, encode, and the [`Image`] handle with its scoped entry points |
//! | [`config`] | `lighttable.toml` loading, validation, and merging over stock defaults |
//! | [`batch`] | Parallel thumbnailing of many files for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Configuration
//!
//! There is no process-wide setting. A [`Lighttable`] is built from a
//! [`config::Config`] once and every handle it opens carries the resulting
//! options. The free functions [`with_image`] and [`with_image_from_memory`]
//! use stock settings.
//!
//! ## Content Sniffing
//!
//! The input format is read from the leading bytes, never from the file
//! extension, so a PNG named `photo.jpg` still opens, and a text file named
//! `photo.png` is reported as not an image.
//!
//! ## Pure-Rust Codecs
//!
//! Everything runs on the `image` crate (AVIF output through `rav1e`). There
//! are no system libraries to install.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;

pub use imaging::{
    Format, Image, ImageOptions, ImageSource, ImagingError, Lighttable, Orientation, Result,
    with_image, with_image_from_memory,
};

#[cfg(test)]
pub(crate) mod test_helpers;
