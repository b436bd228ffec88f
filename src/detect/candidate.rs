//! Per-anchor filtering of raw prediction rows.

use crate::detect::Detection;
use crate::geometry::Rect;
use crate::image::letterbox::ScaleFactors;
use crate::tensor::BOX_ATTRIBUTES;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Returns the index and value of the highest class score.
///
/// Ties resolve to the lowest index. NaN scores never win against a number.
pub(crate) fn best_class(scores: &[f32]) -> Option<(usize, f32)> {
    let mut iter = scores.iter().copied().enumerate();
    let first = iter.next()?;
    Some(iter.fold(first, |best, cur| {
        if cur.1 > best.1 || (best.1.is_nan() && !cur.1.is_nan()) {
            cur
        } else {
            best
        }
    }))
}

/// Decodes one anchor-major row into a detection if its best score passes.
///
/// Box corners are converted from centre form and truncated toward zero.
/// `left`/`top` are evaluated in `f64` and the extents in `f32`.
pub(crate) fn decode_row(
    row: &[f32],
    factors: ScaleFactors,
    conf_threshold: f32,
) -> Option<Detection> {
    let (class_id, score) = best_class(&row[BOX_ATTRIBUTES..])?;
    if !(score > conf_threshold) {
        return None;
    }

    let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
    let left = ((f64::from(cx) - 0.5 * f64::from(w)) * f64::from(factors.x)) as i32;
    let top = ((f64::from(cy) - 0.5 * f64::from(h)) * f64::from(factors.y)) as i32;
    let width = (w * factors.x) as i32;
    let height = (h * factors.y) as i32;

    Some(Detection {
        rect: Rect::new(left, top, width, height),
        confidence: score,
        class_id,
    })
}

/// Scans anchor-major `rows` and keeps every anchor whose best class score
/// exceeds `conf_threshold`, in anchor order.
///
/// Callers guarantee `rows.len()` is a multiple of `num_attributes` and that
/// `num_attributes > 4`.
pub fn extract_candidates(
    rows: &[f32],
    num_attributes: usize,
    factors: ScaleFactors,
    conf_threshold: f32,
) -> Vec<Detection> {
    rows.chunks_exact(num_attributes)
        .filter_map(|row| decode_row(row, factors, conf_threshold))
        .collect()
}

/// Parallel variant of [`extract_candidates`] with identical output order.
#[cfg(feature = "rayon")]
pub fn extract_candidates_par(
    rows: &[f32],
    num_attributes: usize,
    factors: ScaleFactors,
    conf_threshold: f32,
) -> Vec<Detection> {
    rows.par_chunks_exact(num_attributes)
        .filter_map(|row| decode_row(row, factors, conf_threshold))
        .collect()
}
