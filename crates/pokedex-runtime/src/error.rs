//! Error types for the Pokedex runtime
//!
//! One enum per component, plus [`StartupError`] which collects everything
//! that can abort process startup.

use std::path::PathBuf;

/// Guidance attached to [`ModelError::IncompatibleHardware`].
pub const INCOMPATIBLE_HARDWARE_GUIDANCE: &str = "This model was exported for an accelerator \
that is not available on this machine and cannot run in a CPU environment.\n\n\
Re-export the model from the training environment with CPU inference enabled \
and point `model.url` at the new artifact.";

/// Artifact download errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to write artifact {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Model loading and inference errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to load model {path}: {message}\n\n{guidance}")]
    IncompatibleHardware {
        path: PathBuf,
        message: String,
        guidance: &'static str,
    },

    #[error("Failed to load model {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("Invalid class label file {0}: {1}")]
    Labels(PathBuf, String),

    #[error("Model produces {outputs} scores but {labels} class labels are defined")]
    LabelCountMismatch { outputs: usize, labels: usize },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Card catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read card snapshot {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse card snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Feedback log errors
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Failed to append to feedback log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feedback name {0:?}: commas and control characters are not allowed")]
    InvalidName(String),
}

/// Anything that prevents the service from becoming ready
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Startup task failed: {0}")]
    Join(String),
}
