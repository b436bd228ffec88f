//! Inference seam and the end-to-end detection pipeline.
//!
//! The decoder never talks to a runtime directly. Anything that turns a
//! [`Blob`] into a [`PredictionOutput`] can drive a [`Detector`], so backends
//! are swapped without touching decode logic.

#[cfg(feature = "onnx")]
pub mod onnx;

use crate::detect::{decode_with, DecodeConfig, Detection};
use crate::image::blob::{build_blob, Blob, BlobConfig};
use crate::image::letterbox::prepare;
use crate::image::ImageView;
use crate::tensor::PredictionOutput;
use crate::trace::{trace_event, trace_span};
use crate::util::YoloboxResult;

/// Opaque forward pass of a detector network.
///
/// Implementations take `&mut self`; handles that are not reentrant are used
/// one per worker rather than shared.
pub trait InferenceEngine {
    /// Runs the network on a `[1, 3, S, S]` blob and returns its raw output.
    fn infer(&mut self, blob: &Blob) -> YoloboxResult<PredictionOutput>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for &mut E {
    fn infer(&mut self, blob: &Blob) -> YoloboxResult<PredictionOutput> {
        (**self).infer(blob)
    }
}

/// Letterbox, blob, inference and decode for one image at a time.
pub struct Detector<E> {
    engine: E,
    config: DecodeConfig,
    blob: BlobConfig,
}

impl<E: InferenceEngine> Detector<E> {
    /// Creates a detector with default decode and blob settings.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: DecodeConfig::default(),
            blob: BlobConfig::default(),
        }
    }

    /// Replaces the decode configuration.
    pub fn with_config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the blob configuration; its `input_size` is overridden by
    /// the decode configuration.
    pub fn with_blob_config(mut self, blob: BlobConfig) -> Self {
        self.blob = blob;
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Returns the wrapped engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Detects objects in `image`; boxes are in `image` pixel coordinates.
    pub fn detect(&mut self, image: ImageView<'_>) -> YoloboxResult<Vec<Detection>> {
        self.config.validate()?;
        let _span = trace_span!("detect", width = image.width(), height = image.height())
            .entered();

        let letterbox = prepare(image, self.config.input_size)?;
        let blob_cfg = BlobConfig {
            input_size: self.config.input_size,
            ..self.blob
        };
        let blob = build_blob(letterbox.canvas().view(), &blob_cfg)?;
        let output = self.engine.infer(&blob)?;
        trace_event!("inference_done", values = output.data.len());

        let tensor = output.view()?;
        decode_with(&tensor, letterbox.factors(), &self.config)
    }
}
