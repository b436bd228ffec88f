//! ONNX Runtime backend for [`InferenceEngine`].
//!
//! Available when the `onnx` feature is enabled. Sessions always run on the
//! CPU execution provider.

use crate::image::blob::Blob;
use crate::inference::InferenceEngine;
use crate::tensor::PredictionOutput;
use crate::trace::trace_event;
use crate::util::{YoloboxError, YoloboxResult};
use ndarray::ArrayView4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;

/// A loaded detector model and the names of its first input and output.
pub struct OnnxModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxModel {
    /// Loads a model file; any runtime or file error becomes `ModelLoad`.
    pub fn load<P: AsRef<Path>>(path: P) -> YoloboxResult<Self> {
        let path = path.as_ref();
        let load_err = |err: ort::Error| YoloboxError::ModelLoad {
            reason: format!("{}: {err}", path.display()),
        };
        if !path.exists() {
            return Err(YoloboxError::ModelLoad {
                reason: format!("{}: file not found", path.display()),
            });
        }

        let session = Session::builder()
            .map_err(load_err)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(load_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_err)?
            .commit_from_file(path)
            .map_err(load_err)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| YoloboxError::ModelLoad {
                reason: "model declares no inputs".to_string(),
            })?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| YoloboxError::ModelLoad {
                reason: "model declares no outputs".to_string(),
            })?;

        trace_event!(
            "model_loaded",
            input = input_name.as_str(),
            output = output_name.as_str()
        );
        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl InferenceEngine for OnnxModel {
    fn infer(&mut self, blob: &Blob) -> YoloboxResult<PredictionOutput> {
        let infer_err = |err: ort::Error| YoloboxError::Inference {
            reason: err.to_string(),
        };
        let side = blob.side();
        let input = ArrayView4::from_shape((1, 3, side, side), blob.as_slice()).map_err(|err| {
            YoloboxError::Inference {
                reason: format!("invalid blob shape: {err}"),
            }
        })?;
        let tensor = TensorRef::from_array_view(input).map_err(infer_err)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(infer_err)?;
        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(infer_err)?;

        Ok(PredictionOutput {
            shape: output.shape().to_vec(),
            data: output.iter().copied().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_a_load_error() {
        let err = OnnxModel::load("does-not-exist/yolov8n.onnx")
            .err()
            .map(|err| matches!(err, YoloboxError::ModelLoad { .. }));
        assert_eq!(err, Some(true));
    }
}
