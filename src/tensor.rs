//! Views over the raw detector output tensor.
//!
//! A YOLOv8-style head emits `[4 + C][N]` values: four box parameters
//! `(cx, cy, w, h)` followed by `C` class scores, for each of `N` anchors.
//! Exported graphs usually prepend a batch axis, giving `[1, 4 + C, N]`.

use crate::util::{YoloboxError, YoloboxResult};
use std::borrow::Cow;

/// Number of leading box parameters per anchor.
pub const BOX_ATTRIBUTES: usize = 4;

/// Storage order of the prediction buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[attributes][anchors]`, the layout the network produces.
    AttributeMajor,
    /// `[anchors][attributes]`, one contiguous row per anchor.
    AnchorMajor,
}

/// Borrowed prediction tensor with a known shape and layout.
#[derive(Clone, Copy, Debug)]
pub struct PredictionTensor<'a> {
    data: &'a [f32],
    num_attributes: usize,
    num_anchors: usize,
    layout: TensorLayout,
}

impl<'a> PredictionTensor<'a> {
    /// Wraps `data` holding exactly `num_attributes * num_anchors` values.
    pub fn new(
        data: &'a [f32],
        num_attributes: usize,
        num_anchors: usize,
        layout: TensorLayout,
    ) -> YoloboxResult<Self> {
        if num_anchors == 0 {
            return Err(YoloboxError::malformed("tensor has no anchors"));
        }
        if num_attributes <= BOX_ATTRIBUTES {
            return Err(YoloboxError::malformed(format!(
                "expected more than {BOX_ATTRIBUTES} attributes, got {num_attributes}"
            )));
        }
        let expected = num_attributes
            .checked_mul(num_anchors)
            .ok_or_else(|| YoloboxError::malformed("tensor shape overflows"))?;
        if data.len() != expected {
            return Err(YoloboxError::malformed(format!(
                "buffer holds {} values, shape {num_attributes}x{num_anchors} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            num_attributes,
            num_anchors,
            layout,
        })
    }

    /// Interprets a raw network output of shape `[A, N]` or `[1, A, N]`.
    pub fn from_shape(shape: &[usize], data: &'a [f32]) -> YoloboxResult<Self> {
        let (num_attributes, num_anchors) = match *shape {
            [a, n] => (a, n),
            [1, a, n] => (a, n),
            _ => {
                return Err(YoloboxError::malformed(format!(
                    "unsupported output shape {shape:?}"
                )))
            }
        };
        Self::new(data, num_attributes, num_anchors, TensorLayout::AttributeMajor)
    }

    /// Returns `4 + num_classes`.
    pub fn num_attributes(&self) -> usize {
        self.num_attributes
    }

    /// Returns the number of candidate anchors.
    pub fn num_anchors(&self) -> usize {
        self.num_anchors
    }

    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Returns attribute `attr` of anchor `anchor`.
    pub fn value(&self, anchor: usize, attr: usize) -> Option<f32> {
        if anchor >= self.num_anchors || attr >= self.num_attributes {
            return None;
        }
        let idx = match self.layout {
            TensorLayout::AttributeMajor => attr * self.num_anchors + anchor,
            TensorLayout::AnchorMajor => anchor * self.num_attributes + attr,
        };
        self.data.get(idx).copied()
    }

    /// Returns the buffer in anchor-major order, transposing only if needed.
    pub fn to_anchor_major(&self) -> Cow<'a, [f32]> {
        match self.layout {
            TensorLayout::AnchorMajor => Cow::Borrowed(self.data),
            TensorLayout::AttributeMajor => {
                let mut rows = vec![0f32; self.data.len()];
                for (attr, plane) in self.data.chunks_exact(self.num_anchors).enumerate() {
                    for (anchor, &v) in plane.iter().enumerate() {
                        rows[anchor * self.num_attributes + attr] = v;
                    }
                }
                Cow::Owned(rows)
            }
        }
    }
}

/// Owned tensor returned by an inference engine.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionOutput {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl PredictionOutput {
    /// Borrows the output as an attribute-major prediction tensor.
    pub fn view(&self) -> YoloboxResult<PredictionTensor<'_>> {
        PredictionTensor::from_shape(&self.shape, &self.data)
    }
}
