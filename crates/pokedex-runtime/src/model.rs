//! Card classifier
//!
//! The [`Predictor`] trait is the only thing the HTTP layer knows about the
//! model. [`crate::onnx::OnnxPredictor`] is the production implementation.

use crate::error::{ModelError, INCOMPATIBLE_HARDWARE_GUIDANCE};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of classifying one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,
    /// Index of the predicted class in the model output
    pub class_index: usize,
    /// Per-class confidence scores, summing to 1
    pub scores: Vec<f32>,
}

impl Prediction {
    /// Confidence of the predicted class.
    pub fn confidence(&self) -> f32 {
        self.scores.get(self.class_index).copied().unwrap_or(0.0)
    }
}

/// Maps raw image bytes to a card label.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait Predictor: Send + Sync {
    fn predict(&self, image: &[u8]) -> Result<Prediction, ModelError>;

    /// Short name used in logs and the readiness probe.
    fn name(&self) -> &str;
}

/// Failure kinds recognised when a model refuses to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The artifact needs hardware this machine does not have
    IncompatibleHardware,
    /// Anything else
    Other,
}

const INCOMPATIBLE_HARDWARE_SIGNATURES: &[&str] = &[
    "cpu-only machine",
    "cudaexecutionprovider",
    "tensorrtexecutionprovider",
    "no cuda-capable device",
    "cuda driver version is insufficient",
    "could not find an implementation for",
];

/// Classify a load failure by its message.
pub fn classify_load_failure(message: &str) -> LoadFailure {
    let message = message.to_lowercase();
    if INCOMPATIBLE_HARDWARE_SIGNATURES
        .iter()
        .any(|sig| message.contains(sig))
    {
        LoadFailure::IncompatibleHardware
    } else {
        LoadFailure::Other
    }
}

/// Turn a raw load failure into the matching [`ModelError`].
pub fn load_error(path: &Path, message: String) -> ModelError {
    match classify_load_failure(&message) {
        LoadFailure::IncompatibleHardware => ModelError::IncompatibleHardware {
            path: path.to_path_buf(),
            message,
            guidance: INCOMPATIBLE_HARDWARE_GUIDANCE,
        },
        LoadFailure::Other => ModelError::Load {
            path: path.to_path_buf(),
            message,
        },
    }
}

/// Where the model and its labels live, and how images are sized for it
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    /// Square input edge in pixels
    pub input_size: u32,
}

/// Read the class label file: a JSON array of strings, index = class index.
pub fn load_labels(path: &Path) -> Result<Vec<String>, ModelError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ModelError::Labels(path.to_path_buf(), e.to_string()))?;
    let labels: Vec<String> = serde_json::from_str(&content)
        .map_err(|e| ModelError::Labels(path.to_path_buf(), e.to_string()))?;
    if labels.is_empty() {
        return Err(ModelError::Labels(
            path.to_path_buf(),
            "no class labels defined".to_string(),
        ));
    }
    Ok(labels)
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        exps
    }
}

/// Index of the highest score; ties resolve to the lowest index.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
}

/// Build a [`Prediction`] from raw logits and the label table.
pub fn prediction_from_logits(
    logits: &[f32],
    labels: &[String],
) -> Result<Prediction, ModelError> {
    if logits.len() != labels.len() {
        return Err(ModelError::LabelCountMismatch {
            outputs: logits.len(),
            labels: labels.len(),
        });
    }
    let scores = softmax(logits);
    let class_index =
        argmax(&scores).ok_or_else(|| ModelError::Inference("model produced no scores".into()))?;
    Ok(Prediction {
        label: labels[class_index].clone(),
        class_index,
        scores,
    })
}
