//! Batch thumbnailing for the command line.
//!
//! Expands the given paths (directories are walked recursively for files
//! with a decodable extension), then thumbnails each file on the rayon pool.
//! Each worker opens, transforms, saves and releases its own handles; no
//! handle is shared between threads.
//!
//! ## Output naming
//!
//! ```text
//! photos/dawn.jpg  →  photos/dawn_thumb.jpg           (default)
//! photos/dawn.jpg  →  out/dawn_thumb.png              (--output out --format png)
//! ```
//!
//! Outputs are assigned before any work starts. When two sources map to the
//! same output (`a/x.png` and `b/x.png` under `--output out`), the first in
//! sorted order keeps it and the later one is reported as a collision
//! without being decoded.
//!
//! Progress is reported per file through an optional channel, so the CLI
//! can print while workers run.

use crate::imaging::{Format, Image, ImagingError, Lighttable, is_supported_input};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use walkdir::WalkDir;

/// What to produce for every input file.
#[derive(Debug, Clone)]
pub struct ThumbnailJob {
    /// Longer edge of each thumbnail.
    pub size: u32,
    /// Crop to a centered square before thumbnailing.
    pub square: bool,
    /// Directory for outputs; next to each source when `None`.
    pub output_dir: Option<PathBuf>,
    /// Output format; the source's extension when `None`.
    pub format: Option<Format>,
}

/// Outcome for one input file.
#[derive(Debug)]
pub enum BatchEvent {
    Done {
        source: PathBuf,
        output: PathBuf,
        dimensions: (u32, u32),
    },
    Failed {
        source: PathBuf,
        error: ImagingError,
    },
    /// `output` already belongs to the earlier source `first`.
    Collision {
        source: PathBuf,
        output: PathBuf,
        first: PathBuf,
    },
}

impl BatchEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Collision { .. })
    }
}

/// One source with its assigned output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput<'a> {
    pub source: &'a Path,
    pub output: PathBuf,
    /// Earlier source that already writes `output`.
    pub claimed_by: Option<&'a Path>,
}

/// Counts for the final summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub done: usize,
    pub failed: usize,
}

/// Expand files and directories into the list of image files to process.
///
/// Files named explicitly are kept whatever their extension (opening them
/// reports the real error); directory contents are filtered by extension.
/// The result is sorted and free of duplicates.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
                    .filter(|p| is_supported_input(p) && !is_thumbnail(p)),
            );
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Whether a file looks like one of our own outputs (`*_thumb.*`).
fn is_thumbnail(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("_thumb"))
}

/// Where the thumbnail of `source` goes.
pub fn thumbnail_path(source: &Path, job: &ThumbnailJob) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = match job.format {
        Some(format) => format.extension().to_string(),
        None => source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| Format::Png.extension().to_string()),
    };
    let name = format!("{stem}_thumb.{ext}");
    match &job.output_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// Assign every file its output path, in order.
///
/// The first file to claim an output keeps it; later files naming the same
/// output carry `claimed_by`.
pub fn plan_outputs<'a>(files: &'a [PathBuf], job: &ThumbnailJob) -> Vec<PlannedOutput<'a>> {
    let mut claimed: BTreeMap<PathBuf, &'a Path> = BTreeMap::new();
    files
        .iter()
        .map(|source| {
            let output = thumbnail_path(source, job);
            let claimed_by = claimed.get(&output).copied();
            if claimed_by.is_none() {
                claimed.insert(output.clone(), source.as_path());
            }
            PlannedOutput {
                source,
                output,
                claimed_by,
            }
        })
        .collect()
}

/// Thumbnail a single file next to its source (or under the job's output dir).
pub fn thumbnail_one(
    lighttable: &Lighttable,
    source: &Path,
    job: &ThumbnailJob,
) -> Result<(PathBuf, (u32, u32)), ImagingError> {
    let output = thumbnail_path(source, job);
    let dimensions = write_thumbnail(lighttable, source, &output, job)?;
    Ok((output, dimensions))
}

fn write_thumbnail(
    lighttable: &Lighttable,
    source: &Path,
    output: &Path,
    job: &ThumbnailJob,
) -> Result<(u32, u32), ImagingError> {
    lighttable.with_image(source, |img| {
        let save = |thumb: &Image| -> crate::imaging::Result<(u32, u32)> {
            thumb.save(output)?;
            Ok(thumb.dimensions())
        };
        if job.square {
            img.cropped_thumbnail(job.size, save)
        } else {
            img.thumbnail(job.size, save)
        }
    })
}

/// Thumbnail every file in parallel on the current rayon pool.
///
/// Every file is attempted; failures are reported, not fatal. Files whose
/// output collides with an earlier file's count as failed.
pub fn thumbnail_all(
    lighttable: &Lighttable,
    files: &[PathBuf],
    job: &ThumbnailJob,
    progress: Option<Sender<BatchEvent>>,
) -> std::io::Result<BatchSummary> {
    if let Some(dir) = &job.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let plan = plan_outputs(files, job);
    let failures: Vec<bool> = plan
        .par_iter()
        .map_with(progress, |progress, planned| {
            let source = planned.source.to_path_buf();
            let event = if let Some(first) = planned.claimed_by {
                log::warn!(
                    "{}: {} is already written by {}",
                    source.display(),
                    planned.output.display(),
                    first.display()
                );
                BatchEvent::Collision {
                    source,
                    output: planned.output.clone(),
                    first: first.to_path_buf(),
                }
            } else {
                match write_thumbnail(lighttable, planned.source, &planned.output, job) {
                    Ok(dimensions) => BatchEvent::Done {
                        source,
                        output: planned.output.clone(),
                        dimensions,
                    },
                    Err(error) => {
                        log::warn!("{}: {error}", source.display());
                        BatchEvent::Failed { source, error }
                    }
                }
            };
            let failed = event.is_failure();
            if let Some(tx) = progress {
                // Receiver gone means nobody is printing; keep working
                let _ = tx.send(event);
            }
            failed
        })
        .collect();

    let failed = failures.iter().filter(|f| **f).count();
    Ok(BatchSummary {
        done: failures.len() - failed,
        failed,
    })
}
