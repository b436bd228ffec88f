use yolobox::{
    Blob, DecodeConfig, Detector, ImageView, InferenceEngine, PredictionOutput, Rect,
    YoloboxError, YoloboxResult,
};

/// Engine returning a fixed `[1, 6, N]` output and recording blob shapes.
struct FixedEngine {
    rows: Vec<[f32; 6]>,
    seen: Vec<[usize; 4]>,
}

impl InferenceEngine for FixedEngine {
    fn infer(&mut self, blob: &Blob) -> YoloboxResult<PredictionOutput> {
        self.seen.push(blob.shape());
        let anchors = self.rows.len();
        let mut data = vec![0f32; 6 * anchors];
        for (anchor, row) in self.rows.iter().enumerate() {
            for (attr, &value) in row.iter().enumerate() {
                data[attr * anchors + anchor] = value;
            }
        }
        Ok(PredictionOutput {
            shape: vec![1, 6, anchors],
            data,
        })
    }
}

struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn infer(&mut self, _blob: &Blob) -> YoloboxResult<PredictionOutput> {
        Err(YoloboxError::Inference {
            reason: "device lost".to_string(),
        })
    }
}

fn two_class_config() -> DecodeConfig {
    DecodeConfig {
        num_classes: 2,
        input_size: 64,
        ..DecodeConfig::default()
    }
}

#[test]
fn detector_maps_model_space_to_image_pixels() {
    // 128x96 image -> 128x128 canvas -> 64x64 blob, factor 2.
    let image = vec![90u8; 128 * 96 * 3];
    let view = ImageView::from_slice(&image, 128, 96).unwrap();
    let mut engine = FixedEngine {
        rows: vec![
            [32.0, 20.0, 10.0, 8.0, 0.1, 0.85],
            [32.0, 20.0, 10.0, 8.0, 0.6, 0.0],
            [5.0, 5.0, 2.0, 2.0, 0.2, 0.1],
        ],
        seen: Vec::new(),
    };

    let dets = {
        let mut detector = Detector::new(&mut engine).with_config(two_class_config());
        detector.detect(view).unwrap()
    };

    assert_eq!(engine.seen, vec![[1, 3, 64, 64]]);
    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].class_id, 1);
    assert_eq!(dets[0].rect, Rect::new(54, 32, 20, 16));
}

#[test]
fn detector_propagates_engine_errors() {
    let image = vec![0u8; 4 * 4 * 3];
    let view = ImageView::from_slice(&image, 4, 4).unwrap();
    let mut detector = Detector::new(FailingEngine).with_config(two_class_config());
    assert_eq!(
        detector.detect(view).unwrap_err(),
        YoloboxError::Inference {
            reason: "device lost".to_string()
        }
    );
}

#[test]
fn detector_rejects_mismatched_class_count() {
    let image = vec![0u8; 8 * 8 * 3];
    let view = ImageView::from_slice(&image, 8, 8).unwrap();
    let engine = FixedEngine {
        rows: vec![[4.0, 4.0, 2.0, 2.0, 0.9, 0.1]],
        seen: Vec::new(),
    };
    let mut detector = Detector::new(engine).with_config(DecodeConfig {
        num_classes: 80,
        input_size: 8,
        ..DecodeConfig::default()
    });
    assert!(matches!(
        detector.detect(view),
        Err(YoloboxError::MalformedTensor { .. })
    ));
    assert_eq!(detector.into_engine().seen.len(), 1);
}

#[test]
fn detector_checks_thresholds_before_inference() {
    let image = vec![0u8; 8 * 8 * 3];
    let view = ImageView::from_slice(&image, 8, 8).unwrap();
    let engine = FixedEngine {
        rows: vec![[4.0, 4.0, 2.0, 2.0, 0.9, 0.1]],
        seen: Vec::new(),
    };
    let mut detector = Detector::new(engine).with_config(DecodeConfig {
        conf_threshold: 2.0,
        ..two_class_config()
    });
    assert!(matches!(
        detector.detect(view),
        Err(YoloboxError::InvalidThreshold { .. })
    ));
    assert!(detector.into_engine().seen.is_empty());
}
