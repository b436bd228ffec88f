//! Error types for yolobox.

use thiserror::Error;

/// Result alias for yolobox operations.
pub type YoloboxResult<T> = std::result::Result<T, YoloboxError>;

/// Errors that can occur while preparing images or decoding detections.
///
/// Every variant is fatal to a single run; nothing in the pipeline retries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum YoloboxError {
    /// The image has a zero dimension.
    #[error("invalid image: {width}x{height}")]
    InvalidImage { width: usize, height: usize },
    /// The backing buffer is shorter than the declared image.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The row stride cannot hold one row of pixels.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The prediction tensor does not have the expected shape.
    #[error("malformed tensor: {reason}")]
    MalformedTensor { reason: String },
    /// A threshold is outside `[0, 1]`.
    #[error("invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// A configuration value is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The detector model could not be loaded.
    #[error("model load error: {reason}")]
    ModelLoad { reason: String },
    /// The inference engine failed to produce an output tensor.
    #[error("inference error: {reason}")]
    Inference { reason: String },
    /// An image file could not be read or decoded.
    #[error("image decode error: {reason}")]
    ImageDecode { reason: String },
    /// An image could not be encoded or written.
    #[error("image encode error: {reason}")]
    ImageEncode { reason: String },
    /// A font file could not be read or parsed.
    #[error("font load error: {reason}")]
    FontLoad { reason: String },
}

impl YoloboxError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTensor {
            reason: reason.into(),
        }
    }
}
