//! Startup sequence: fetch artifacts, then load the model.

use crate::error::StartupError;
use crate::fetch::ArtifactFetcher;
use crate::model::{ModelSpec, Predictor};
use crate::onnx::OnnxPredictor;
use std::sync::Arc;
use tracing::info;

/// Remote locations of the model artifacts
#[derive(Debug, Clone)]
pub struct ArtifactSources {
    pub model_url: String,
    /// When unset the label file must already exist locally.
    pub labels_url: Option<String>,
}

/// Download whatever is missing and deserialize the model.
///
/// Session creation is blocking work and runs on the blocking pool.
pub async fn prepare_model(
    fetcher: &ArtifactFetcher,
    sources: &ArtifactSources,
    spec: ModelSpec,
) -> Result<Arc<dyn Predictor>, StartupError> {
    info!("Fetching model artifacts");
    fetcher.ensure(&sources.model_url, &spec.model_path).await?;
    if let Some(labels_url) = &sources.labels_url {
        fetcher.ensure(labels_url, &spec.labels_path).await?;
    }

    info!("Loading model from {}", spec.model_path.display());
    let predictor = tokio::task::spawn_blocking(move || OnnxPredictor::load(&spec))
        .await
        .map_err(|e| StartupError::Join(e.to_string()))??;

    Ok(Arc::new(predictor))
}
