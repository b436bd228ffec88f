use yolobox::{
    decode, decode_with, DecodeConfig, Detection, PredictionTensor, Rect, ScaleFactors,
    TensorLayout, YoloboxError,
};

/// Packs per-anchor rows into the attribute-major layout a network emits.
fn attribute_major(rows: &[Vec<f32>]) -> Vec<f32> {
    let num_attributes = rows[0].len();
    let mut data = vec![0f32; num_attributes * rows.len()];
    for (anchor, row) in rows.iter().enumerate() {
        for (attr, &value) in row.iter().enumerate() {
            data[attr * rows.len() + anchor] = value;
        }
    }
    data
}

fn decode_rows(rows: &[Vec<f32>], conf: f32, nms: f32) -> Vec<Detection> {
    let data = attribute_major(rows);
    let num_classes = rows[0].len() - 4;
    let tensor = PredictionTensor::from_shape(&[1, rows[0].len(), rows.len()], &data).unwrap();
    decode(&tensor, num_classes, 1.0, 1.0, conf, nms).unwrap()
}

#[test]
fn single_anchor_decodes_to_corner_box() {
    let rows = vec![vec![320.0, 320.0, 100.0, 50.0, 0.9, 0.1]];
    let dets = decode_rows(&rows, 0.25, 0.45);

    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].rect, Rect::new(270, 295, 100, 50));
    assert_eq!(dets[0].confidence, 0.9);
    assert_eq!(dets[0].class_id, 0);
}

#[test]
fn overlapping_same_class_keeps_higher_confidence() {
    let rows = vec![
        vec![322.0, 321.0, 100.0, 50.0, 0.8, 0.0],
        vec![320.0, 320.0, 100.0, 50.0, 0.9, 0.0],
    ];
    let dets = decode_rows(&rows, 0.25, 0.45);

    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].confidence, 0.9);
    assert_eq!(dets[0].rect, Rect::new(270, 295, 100, 50));
}

#[test]
fn overlapping_different_classes_suppress_each_other() {
    let rows = vec![
        vec![320.0, 320.0, 100.0, 50.0, 0.9, 0.05],
        vec![321.0, 320.0, 100.0, 50.0, 0.1, 0.8],
    ];
    let dets = decode_rows(&rows, 0.25, 0.45);

    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].class_id, 0);
}

#[test]
fn no_passing_scores_is_an_empty_success() {
    let rows = vec![
        vec![100.0, 100.0, 20.0, 20.0, 0.25, 0.1],
        vec![200.0, 200.0, 20.0, 20.0, 0.0, 0.2],
    ];
    assert!(decode_rows(&rows, 0.25, 0.45).is_empty());
}

#[test]
fn emission_order_is_confidence_descending() {
    let rows = vec![
        vec![50.0, 50.0, 10.0, 10.0, 0.4, 0.0],
        vec![150.0, 50.0, 10.0, 10.0, 0.0, 0.95],
        vec![250.0, 50.0, 10.0, 10.0, 0.6, 0.0],
        vec![350.0, 50.0, 10.0, 10.0, 0.6, 0.0],
    ];
    let dets = decode_rows(&rows, 0.25, 0.45);
    let lefts: Vec<i32> = dets.iter().map(|d| d.rect.left).collect();
    assert_eq!(lefts, vec![145, 245, 345, 45]);
    assert_eq!(decode_rows(&rows, 0.25, 0.45), dets);
}

#[test]
fn scale_factors_map_back_to_image_pixels() {
    // A 1280x720 image letterboxed to 1280x1280 and resized to 640.
    let rows = vec![vec![100.0, 50.0, 40.0, 20.0, 0.0, 0.0, 0.7]];
    let data = attribute_major(&rows);
    let tensor = PredictionTensor::from_shape(&[7, 1], &data).unwrap();
    let cfg = DecodeConfig {
        num_classes: 3,
        ..DecodeConfig::default()
    };
    let dets = decode_with(&tensor, ScaleFactors { x: 2.0, y: 2.0 }, &cfg).unwrap();

    assert_eq!(dets[0].rect, Rect::new(160, 80, 80, 40));
    assert_eq!(dets[0].class_id, 2);
}

#[test]
fn anchor_major_input_matches_attribute_major() {
    let rows = vec![
        vec![320.0, 320.0, 100.0, 50.0, 0.9, 0.1],
        vec![100.0, 100.0, 30.0, 30.0, 0.2, 0.7],
    ];
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    let tensor = PredictionTensor::new(&flat, 6, 2, TensorLayout::AnchorMajor).unwrap();
    let dets = decode(&tensor, 2, 1.0, 1.0, 0.25, 0.45).unwrap();
    assert_eq!(dets, decode_rows(&rows, 0.25, 0.45));
}

#[test]
fn max_detections_truncates_emission() {
    let rows = vec![
        vec![50.0, 50.0, 10.0, 10.0, 0.5],
        vec![150.0, 50.0, 10.0, 10.0, 0.7],
        vec![250.0, 50.0, 10.0, 10.0, 0.9],
    ];
    let data = attribute_major(&rows);
    let tensor = PredictionTensor::from_shape(&[5, 3], &data).unwrap();
    let cfg = DecodeConfig {
        num_classes: 1,
        max_detections: Some(2),
        ..DecodeConfig::default()
    };
    let dets = decode_with(&tensor, ScaleFactors::IDENTITY, &cfg).unwrap();
    let scores: Vec<f32> = dets.iter().map(|d| d.confidence).collect();
    assert_eq!(scores, vec![0.9, 0.7]);
}

#[test]
fn attribute_count_must_match_classes() {
    let data = vec![0f32; 84 * 3];
    let tensor = PredictionTensor::from_shape(&[1, 84, 3], &data).unwrap();
    assert!(decode(&tensor, 80, 1.0, 1.0, 0.25, 0.45).is_ok());

    let err = decode(&tensor, 79, 1.0, 1.0, 0.25, 0.45).unwrap_err();
    assert!(matches!(err, YoloboxError::MalformedTensor { .. }));
}

#[test]
fn negative_threshold_is_invalid() {
    let data = vec![0f32; 6];
    let tensor = PredictionTensor::from_shape(&[6, 1], &data).unwrap();
    assert_eq!(
        decode(&tensor, 2, 1.0, 1.0, 0.25, -0.1).unwrap_err(),
        YoloboxError::InvalidThreshold {
            name: "nms_threshold",
            value: -0.1
        }
    );
}

#[test]
fn identical_zero_area_boxes_collapse_to_one() {
    let rows = vec![
        vec![100.0, 100.0, 0.0, 0.0, 0.9],
        vec![100.0, 100.0, 0.0, 0.0, 0.8],
        vec![100.0, 100.0, 20.0, 20.0, 0.7],
    ];
    let dets = decode_rows(&rows, 0.25, 0.45);

    assert_eq!(dets.len(), 2);
    assert_eq!(dets[0].rect, Rect::new(100, 100, 0, 0));
    assert_eq!(dets[0].confidence, 0.9);
    assert_eq!(dets[1].rect, Rect::new(90, 90, 20, 20));
}
