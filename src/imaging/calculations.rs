//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Truncate a requested dimension toward zero and check it is usable.
///
/// Returns `None` for anything that does not resolve to at least 1 pixel,
/// including NaN and values beyond `u32::MAX`.
pub fn resolve_dimension(value: f64) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < 1.0 || truncated > u32::MAX as f64 {
        return None;
    }
    Some(truncated as u32)
}

/// Calculate dimensions that fit `source` inside a `max_edge` square.
///
/// The longer edge becomes exactly `max_edge`; the shorter edge keeps the
/// source aspect ratio, rounded to the nearest integer and never below 1.
/// Images smaller than `max_edge` are scaled up.
///
/// # Examples
/// ```
/// # use lighttable::imaging::calculate_thumbnail_dimensions;
/// // 4:3 landscape into 100px → 100x75
/// assert_eq!(calculate_thumbnail_dimensions((800, 600), 100), (100, 75));
///
/// // 38x50 portrait into 29px → 22x29
/// assert_eq!(calculate_thumbnail_dimensions((38, 50), 29), (22, 29));
/// ```
pub fn calculate_thumbnail_dimensions(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;

    if src_w >= src_h {
        // Landscape or square: width is the long edge
        let ratio = max_edge as f64 / src_w as f64;
        let h = ((src_h as f64 * ratio).round() as u32).max(1);
        (max_edge, h)
    } else {
        // Portrait: height is the long edge
        let ratio = max_edge as f64 / src_h as f64;
        let w = ((src_w as f64 * ratio).round() as u32).max(1);
        (w, max_edge)
    }
}

/// Calculate the centered square crop of an image as `(left, top, right, bottom)`.
///
/// The side is the shorter edge; the offset along the longer edge is
/// `|w - h| / 2` (integer division).
pub fn calculate_centered_square(source: (u32, u32)) -> (u32, u32, u32, u32) {
    let (w, h) = source;
    let half = w.abs_diff(h) / 2;

    if w > h {
        (half, 0, half + h, h)
    } else if h > w {
        (0, half, w, half + w)
    } else {
        (0, 0, w, h)
    }
}
