//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Thumbnail
//!
//! ```text
//! photos/dawn.jpg → photos/dawn_thumb.jpg (100x75)
//! photos/notes.jpg: Not an image: photos/notes.jpg: unrecognized header
//! b/x.jpg: out/x_thumb.jpg is already written by a/x.jpg
//! Thumbnailed 1 image, 1 failed
//! ```
//!
//! ## Identify
//!
//! ```text
//! photos/dawn.jpg  JPEG  4000x3000
//! ```
//!
//! Each command has a `format_*` function (returns `String` or `Vec<String>`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchSummary};
use crate::imaging::{Format, Image};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What `identify` reports about one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub format: Option<Format>,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(path: &Path, image: &Image) -> Self {
        Self {
            path: path.to_path_buf(),
            format: image.format(),
            width: image.width(),
            height: image.height(),
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Thumbnail
// ============================================================================

pub fn format_batch_event(event: &BatchEvent) -> String {
    match event {
        BatchEvent::Done {
            source,
            output,
            dimensions: (w, h),
        } => format!("{} → {} ({w}x{h})", source.display(), output.display()),
        BatchEvent::Failed { source, error } => format!("{}: {error}", source.display()),
        BatchEvent::Collision {
            source,
            output,
            first,
        } => format!(
            "{}: {} is already written by {}",
            source.display(),
            output.display(),
            first.display()
        ),
    }
}

/// Final line after a batch.
///
/// ```text
/// Thumbnailed 3 images
/// Thumbnailed 2 images, 1 failed
/// ```
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let done = format!("Thumbnailed {}", plural(summary.done, "image"));
    if summary.failed == 0 {
        done
    } else {
        format!("{done}, {} failed", summary.failed)
    }
}

pub fn print_batch_summary(summary: &BatchSummary) {
    println!("{}", format_batch_summary(summary));
}

// ============================================================================
// Identify
// ============================================================================

pub fn format_identify(infos: &[ImageInfo]) -> Vec<String> {
    let width = infos
        .iter()
        .map(|info| info.path.display().to_string().len())
        .max()
        .unwrap_or(0);
    infos
        .iter()
        .map(|info| {
            let format = info
                .format
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:<width$}  {:<4}  {}x{}",
                info.path.display().to_string(),
                format,
                info.width,
                info.height
            )
        })
        .collect()
}

pub fn format_identify_json(infos: &[ImageInfo]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(infos)
}

pub fn print_identify(infos: &[ImageInfo]) {
    for line in format_identify(infos) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImagingError;

    fn info(path: &str, format: Option<Format>, width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            path: PathBuf::from(path),
            format,
            width,
            height,
        }
    }

    #[test]
    fn batch_event_done() {
        let event = BatchEvent::Done {
            source: PathBuf::from("photos/dawn.jpg"),
            output: PathBuf::from("photos/dawn_thumb.jpg"),
            dimensions: (100, 75),
        };
        assert_eq!(
            format_batch_event(&event),
            "photos/dawn.jpg → photos/dawn_thumb.jpg (100x75)"
        );
    }

    #[test]
    fn batch_event_failed() {
        let event = BatchEvent::Failed {
            source: PathBuf::from("gone.png"),
            error: ImagingError::PathNotFound(PathBuf::from("gone.png")),
        };
        let line = format_batch_event(&event);
        assert!(line.starts_with("gone.png: "));
        assert!(line.contains("gone.png"));
    }

    #[test]
    fn batch_event_collision() {
        let event = BatchEvent::Collision {
            source: PathBuf::from("b/x.jpg"),
            output: PathBuf::from("out/x_thumb.jpg"),
            first: PathBuf::from("a/x.jpg"),
        };
        assert!(event.is_failure());
        assert_eq!(
            format_batch_event(&event),
            "b/x.jpg: out/x_thumb.jpg is already written by a/x.jpg"
        );
    }

    #[test]
    fn summary_without_failures() {
        let summary = BatchSummary { done: 3, failed: 0 };
        assert_eq!(format_batch_summary(&summary), "Thumbnailed 3 images");
    }

    #[test]
    fn summary_singular() {
        let summary = BatchSummary { done: 1, failed: 0 };
        assert_eq!(format_batch_summary(&summary), "Thumbnailed 1 image");
    }

    #[test]
    fn summary_with_failures() {
        let summary = BatchSummary { done: 2, failed: 1 };
        assert_eq!(format_batch_summary(&summary), "Thumbnailed 2 images, 1 failed");
    }

    #[test]
    fn identify_aligns_paths() {
        let lines = format_identify(&[
            info("a.png", Some(Format::Png), 10, 20),
            info("long/b.jpg", Some(Format::Jpeg), 300, 200),
        ]);
        assert_eq!(lines[0], "a.png       PNG   10x20");
        assert_eq!(lines[1], "long/b.jpg  JPEG  300x200");
    }

    #[test]
    fn identify_empty() {
        assert!(format_identify(&[]).is_empty());
    }

    #[test]
    fn identify_json_fields() {
        let json = format_identify_json(&[info("a.png", Some(Format::Png), 10, 20)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["format"], "png");
        assert_eq!(value[0]["width"], 10);
        assert_eq!(value[0]["height"], 20);
        assert_eq!(value[0]["path"], "a.png");
    }
}
