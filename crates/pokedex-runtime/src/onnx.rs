//! ONNX Runtime card classifier
//!
//! Preprocessing follows the usual ImageNet recipe: RGB, square resize,
//! scale to [0, 1], per-channel mean/std normalization, CHW layout.

use crate::error::ModelError;
use crate::model::{
    load_error, load_labels, prediction_from_logits, ModelSpec, Prediction, Predictor,
};
use image::imageops::FilterType;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Classifier backed by an ONNX Runtime session.
pub struct OnnxPredictor {
    /// `Session::run` needs `&mut self`
    session: Mutex<Session>,
    labels: Vec<String>,
    input_size: u32,
    model_name: String,
}

impl std::fmt::Debug for OnnxPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPredictor")
            .field("model_name", &self.model_name)
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .finish()
    }
}

impl OnnxPredictor {
    /// Load the model and its labels. Blocking; call from a blocking context.
    pub fn load(spec: &ModelSpec) -> Result<Self, ModelError> {
        let labels = load_labels(&spec.labels_path)?;
        let session = create_session(&spec.model_path)?;

        let model_name = spec
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx-model")
            .to_string();

        info!(
            model = %model_name,
            classes = labels.len(),
            input_size = spec.input_size,
            "Model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input_size: spec.input_size,
            model_name,
        })
    }

    fn infer(&self, input: Vec<f32>) -> Result<Vec<f32>, ModelError> {
        let edge = self.input_size as i64;
        let tensor = Tensor::from_array((vec![1i64, 3, edge, edge], input))
            .map_err(|e| ModelError::Inference(format!("tensor creation error: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ModelError::Inference(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let (_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| ModelError::Inference("no output tensor".to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("tensor extraction failed: {e}")))?;

        // [batch=1, classes] or a flat [classes]
        let classes = shape.last().copied().unwrap_or(0).max(0) as usize;
        if data.len() < classes {
            return Err(ModelError::Inference(format!(
                "unexpected output shape: {shape:?}"
            )));
        }
        Ok(data[..classes].to_vec())
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, image: &[u8]) -> Result<Prediction, ModelError> {
        let input = preprocess(image, self.input_size)?;
        let logits = self.infer(input)?;
        let prediction = prediction_from_logits(&logits, &self.labels)?;
        debug!(
            label = %prediction.label,
            confidence = prediction.confidence(),
            "Prediction"
        );
        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

fn create_session(path: &Path) -> Result<Session, ModelError> {
    Session::builder()
        .map_err(|e| load_error(path, e.to_string()))?
        .commit_from_file(path)
        .map_err(|e| load_error(path, e.to_string()))
}

/// Decode image bytes into a normalized `[3, size, size]` tensor buffer.
pub fn preprocess(bytes: &[u8], size: u32) -> Result<Vec<f32>, ModelError> {
    let image = image::load_from_memory(bytes).map_err(|e| ModelError::Decode(e.to_string()))?;
    let rgb = image
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();

    let plane = (size * size) as usize;
    let mut out = vec![0.0f32; 3 * plane];
    for (i, pixel) in rgb.pixels().enumerate() {
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            out[c * plane + i] = (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }
    Ok(out)
}
