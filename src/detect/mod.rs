//! Decoding of raw detector output into suppressed, image-space detections.
//!
//! Decoding runs in three steps: the tensor is viewed anchor-major, every
//! anchor whose best class score exceeds the confidence threshold becomes a
//! candidate box, and candidates of all classes are then suppressed jointly
//! by greedy IoU NMS in descending confidence order.

pub(crate) mod candidate;
pub(crate) mod nms;

use crate::geometry::Rect;
use crate::image::letterbox::{ScaleFactors, DEFAULT_INPUT_SIZE};
use crate::tensor::{PredictionTensor, BOX_ATTRIBUTES};
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloboxError, YoloboxResult};

/// A labelled box with its confidence score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Box in original-image pixels.
    pub rect: Rect,
    /// Best class score, in `[0, 1]` for well-formed models.
    pub confidence: f32,
    /// Index of the best class, in `[0, num_classes)`.
    pub class_id: usize,
}

impl Detection {
    /// Overlay text used when rendering this detection.
    pub fn label(&self) -> String {
        format!("Class: {}, Conf: {:.2}", self.class_id, self.confidence)
    }
}

/// Configuration for decoding and suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Number of class scores per anchor.
    pub num_classes: usize,
    /// Square model input side `S`.
    pub input_size: usize,
    /// Minimum best-class score (exclusive) for an anchor to become a candidate.
    pub conf_threshold: f32,
    /// IoU above which a lower-scored candidate is suppressed.
    pub nms_threshold: f32,
    /// Cap on emitted detections; `None` keeps all survivors.
    pub max_detections: Option<usize>,
    /// Extract candidates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            num_classes: 80,
            input_size: DEFAULT_INPUT_SIZE,
            conf_threshold: 0.25,
            nms_threshold: 0.45,
            max_detections: None,
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Checks thresholds and sizes before any decoding work.
    pub fn validate(&self) -> YoloboxResult<()> {
        check_threshold("conf_threshold", self.conf_threshold)?;
        check_threshold("nms_threshold", self.nms_threshold)?;
        if self.num_classes == 0 {
            return Err(YoloboxError::InvalidConfig("num_classes must be positive"));
        }
        if self.input_size == 0 {
            return Err(YoloboxError::InvalidConfig("input_size must be positive"));
        }
        self.num_attributes()?;
        Ok(())
    }

    /// Returns `4 + num_classes`, the attribute count a matching tensor has.
    pub fn num_attributes(&self) -> YoloboxResult<usize> {
        BOX_ATTRIBUTES
            .checked_add(self.num_classes)
            .ok_or(YoloboxError::InvalidConfig("num_classes is too large"))
    }
}

fn check_threshold(name: &'static str, value: f32) -> YoloboxResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(YoloboxError::InvalidThreshold { name, value })
    }
}

/// Decodes `tensor` with explicit parameters.
///
/// `x_factor`/`y_factor` map model-input coordinates to canvas pixels (see
/// [`crate::prepare`]). An input where no anchor passes the confidence
/// threshold yields an empty list.
pub fn decode(
    tensor: &PredictionTensor<'_>,
    num_classes: usize,
    x_factor: f32,
    y_factor: f32,
    conf_threshold: f32,
    nms_threshold: f32,
) -> YoloboxResult<Vec<Detection>> {
    let cfg = DecodeConfig {
        num_classes,
        conf_threshold,
        nms_threshold,
        ..DecodeConfig::default()
    };
    decode_with(
        tensor,
        ScaleFactors {
            x: x_factor,
            y: y_factor,
        },
        &cfg,
    )
}

/// Decodes `tensor` using a [`DecodeConfig`].
pub fn decode_with(
    tensor: &PredictionTensor<'_>,
    factors: ScaleFactors,
    cfg: &DecodeConfig,
) -> YoloboxResult<Vec<Detection>> {
    cfg.validate()?;
    let num_attributes = cfg.num_attributes()?;
    if tensor.num_attributes() != num_attributes {
        return Err(YoloboxError::malformed(format!(
            "expected {num_attributes} attributes for {} classes, got {}",
            cfg.num_classes,
            tensor.num_attributes()
        )));
    }

    let _span = trace_span!("decode", anchors = tensor.num_anchors()).entered();
    let rows = tensor.to_anchor_major();
    let candidates = extract(&rows, num_attributes, factors, cfg.conf_threshold, cfg.parallel);
    trace_event!("candidates", count = candidates.len());

    let detections = nms::non_maximum_suppression(
        &candidates,
        cfg.conf_threshold,
        cfg.nms_threshold,
        cfg.max_detections,
    );
    trace_event!("suppressed", kept = detections.len());
    Ok(detections)
}

#[cfg(feature = "rayon")]
fn extract(
    rows: &[f32],
    num_attributes: usize,
    factors: ScaleFactors,
    conf_threshold: f32,
    parallel: bool,
) -> Vec<Detection> {
    if parallel {
        candidate::extract_candidates_par(rows, num_attributes, factors, conf_threshold)
    } else {
        candidate::extract_candidates(rows, num_attributes, factors, conf_threshold)
    }
}

#[cfg(not(feature = "rayon"))]
fn extract(
    rows: &[f32],
    num_attributes: usize,
    factors: ScaleFactors,
    conf_threshold: f32,
    _parallel: bool,
) -> Vec<Detection> {
    candidate::extract_candidates(rows, num_attributes, factors, conf_threshold)
}
