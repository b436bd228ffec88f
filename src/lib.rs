//! Yolobox turns the raw output tensor of a YOLO-style detector into a clean
//! list of labelled boxes on the original image.
//!
//! The core is dependency-light: letterbox padding, blob construction,
//! candidate decoding and class-agnostic non-maximum suppression. Image file
//! I/O (`image-io`), box rendering (`render`), an ONNX Runtime backend
//! (`onnx`), parallel candidate extraction (`rayon`) and `tracing` spans are
//! optional features.

pub mod detect;
pub mod geometry;
pub mod image;
pub mod inference;
pub mod lowlevel;
#[cfg(feature = "render")]
pub mod render;
pub mod tensor;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use detect::{decode, decode_with, DecodeConfig, Detection};
pub use geometry::{iou, Rect};
pub use crate::image::blob::{build_blob, Blob, BlobConfig};
pub use crate::image::letterbox::{prepare, Letterbox, ScaleFactors, DEFAULT_INPUT_SIZE};
pub use crate::image::{ImageView, OwnedImage};
pub use inference::{Detector, InferenceEngine};
pub use tensor::{PredictionOutput, PredictionTensor, TensorLayout};
pub use util::{YoloboxError, YoloboxResult};

pub use detect::nms::{nms_boxes, non_maximum_suppression};

#[cfg(feature = "onnx")]
pub use inference::onnx::OnnxModel;
