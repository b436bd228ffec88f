//! Square padding of arbitrary images for fixed-size detector inputs.
//!
//! The source image is copied unscaled into the top-left corner of a black
//! square canvas whose side is the longer image edge. Because the image sits
//! at the origin, model-space coordinates only need to be multiplied by the
//! canvas-to-input ratio to land in original-image pixels.

use crate::image::{ImageView, OwnedImage, CHANNELS};
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloboxError, YoloboxResult};

/// Default square input side of YOLOv8-style detectors.
pub const DEFAULT_INPUT_SIZE: usize = 640;

/// Multipliers mapping model-input coordinates back to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    /// Canvas width divided by the model input side.
    pub x: f32,
    /// Canvas height divided by the model input side.
    pub y: f32,
}

impl ScaleFactors {
    /// Factors for a tensor that is already expressed in image pixels.
    pub const IDENTITY: ScaleFactors = ScaleFactors { x: 1.0, y: 1.0 };
}

/// A padded square canvas and the factors that undo the model resize.
#[derive(Clone, Debug)]
pub struct Letterbox {
    canvas: OwnedImage,
    factors: ScaleFactors,
}

impl Letterbox {
    /// Returns the square canvas.
    pub fn canvas(&self) -> &OwnedImage {
        &self.canvas
    }

    /// Returns the canvas-to-input scale factors.
    pub fn factors(&self) -> ScaleFactors {
        self.factors
    }

    /// Splits into the canvas and its scale factors.
    pub fn into_parts(self) -> (OwnedImage, ScaleFactors) {
        (self.canvas, self.factors)
    }
}

/// Pads `image` to a black square of side `max(width, height)`.
///
/// `input_size` is the detector's square input side `S`; the returned factors
/// are `canvas.width / S` and `canvas.height / S`. The source view is only read.
pub fn prepare(image: ImageView<'_>, input_size: usize) -> YoloboxResult<Letterbox> {
    if input_size == 0 {
        return Err(YoloboxError::InvalidConfig("input_size must be positive"));
    }
    let width = image.width();
    let height = image.height();
    let side = width.max(height);
    let _span = trace_span!("letterbox", width = width, height = height).entered();

    let mut canvas = OwnedImage::zeros(side, side)?;
    let row_len = width * CHANNELS;
    for y in 0..height {
        let src = image.row(y).ok_or(YoloboxError::BufferTooSmall {
            needed: (y + 1) * image.stride(),
            got: image.as_slice().len(),
        })?;
        canvas.row_mut(y)[..row_len].copy_from_slice(src);
    }

    let factors = ScaleFactors {
        x: canvas.width() as f32 / input_size as f32,
        y: canvas.height() as f32 / input_size as f32,
    };
    trace_event!("letterbox_done", side = side, x_factor = factors.x);
    Ok(Letterbox { canvas, factors })
}
