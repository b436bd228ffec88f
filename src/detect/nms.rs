//! Greedy non-maximum suppression over axis-aligned boxes.

use crate::detect::Detection;
use crate::geometry::{iou, Rect};

/// Selects the boxes that survive greedy IoU suppression.
///
/// Entries scoring at or below `score_threshold` are ignored. The remaining
/// entries are visited by descending score (stable, so equal scores keep
/// their input order) and kept unless their IoU with an already kept box
/// exceeds `nms_threshold`. Degenerate boxes overlap nothing, except that a
/// zero-area box is dropped when an identical one was already kept. Class
/// identity plays no part. At most
/// `max_detections` indices are returned when a limit is given.
///
/// The returned indices point into `boxes` and are in emission order. Extra
/// entries of the longer slice are ignored when lengths differ.
pub fn nms_boxes(
    boxes: &[Rect],
    scores: &[f32],
    score_threshold: f32,
    nms_threshold: f32,
    max_detections: Option<usize>,
) -> Vec<usize> {
    let len = boxes.len().min(scores.len());
    let mut order: Vec<usize> = (0..len).filter(|&i| scores[i] > score_threshold).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let limit = max_detections.unwrap_or(usize::MAX);
    let mut kept: Vec<usize> = Vec::new();

    'outer: for idx in order {
        if kept.len() >= limit {
            break;
        }
        for &kept_idx in kept.iter() {
            if suppresses(&boxes[kept_idx], &boxes[idx], nms_threshold) {
                continue 'outer;
            }
        }
        kept.push(idx);
    }

    kept
}

fn suppresses(kept: &Rect, candidate: &Rect, nms_threshold: f32) -> bool {
    if candidate.is_empty() {
        return candidate == kept;
    }
    iou(kept, candidate) > nms_threshold
}

/// Applies [`nms_boxes`] to detections and returns the survivors in
/// emission order.
pub fn non_maximum_suppression(
    detections: &[Detection],
    score_threshold: f32,
    nms_threshold: f32,
    max_detections: Option<usize>,
) -> Vec<Detection> {
    let boxes: Vec<Rect> = detections.iter().map(|d| d.rect).collect();
    let scores: Vec<f32> = detections.iter().map(|d| d.confidence).collect();
    nms_boxes(&boxes, &scores, score_threshold, nms_threshold, max_detections)
        .into_iter()
        .map(|idx| detections[idx])
        .collect()
}
