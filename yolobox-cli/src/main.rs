use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use yolobox::io::{load_rgb_image, save_rgb_image, view_from_rgb_image};
use yolobox::render::{draw_detections, load_font};
use yolobox::{DecodeConfig, Detection, Detector, OnnxModel};

/// Optional settings file read from the working directory.
const CONFIG_FILE: &str = "yolobox.json";

#[derive(Parser, Debug)]
#[command(
    about = "Detect objects in input.jpg with yolov8n.onnx and write detections.jpg",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct Config {
    model_path: String,
    image_path: String,
    output_path: String,
    font_path: String,
    num_classes: usize,
    input_size: usize,
    conf_threshold: f32,
    nms_threshold: f32,
    max_detections: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            model_path: "yolov8n.onnx".to_string(),
            image_path: "input.jpg".to_string(),
            output_path: "detections.jpg".to_string(),
            font_path: "font.ttf".to_string(),
            num_classes: cfg.num_classes,
            input_size: cfg.input_size,
            conf_threshold: cfg.conf_threshold,
            nms_threshold: cfg.nms_threshold,
            max_detections: cfg.max_detections,
        }
    }
}

impl Config {
    fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            num_classes: self.num_classes,
            input_size: self.input_size,
            conf_threshold: self.conf_threshold,
            nms_threshold: self.nms_threshold,
            max_detections: self.max_detections,
            ..DecodeConfig::default()
        }
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_id: usize,
    confidence: f32,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl From<&Detection> for DetectionRecord {
    fn from(value: &Detection) -> Self {
        Self {
            class_id: value.class_id,
            confidence: value.confidence,
            left: value.rect.left,
            top: value.rect.top,
            width: value.rect.width,
            height: value.rect.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    image: String,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("yolobox=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(Path::new(CONFIG_FILE))?;
    let model = OnnxModel::load(&config.model_path)?;
    let image = load_rgb_image(&config.image_path)?;

    let mut detector = Detector::new(model).with_config(config.decode_config());
    let detections = detector.detect(view_from_rgb_image(&image)?)?;
    for det in &detections {
        tracing::info!(
            left = det.rect.left,
            top = det.rect.top,
            width = det.rect.width,
            height = det.rect.height,
            "{}",
            det.label()
        );
    }

    let font = if Path::new(&config.font_path).exists() {
        Some(load_font(&config.font_path)?)
    } else {
        tracing::warn!(font = %config.font_path, "font not found, drawing boxes without labels");
        None
    };
    let annotated = draw_detections(&image, &detections, font.as_ref());
    save_rgb_image(&annotated, &config.output_path)?;
    tracing::info!(path = %config.output_path, count = detections.len(), "saved detections");

    let output = Output {
        image: config.output_path.clone(),
        detections: detections.iter().map(DetectionRecord::from).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
