//! Pokedex Runtime - card recognition building blocks
//!
//! Artifact download, the card classifier, the card catalog and the feedback
//! log. The HTTP front end lives in `pokedex-cli`.

pub mod catalog;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod model;
pub mod onnx;
pub mod startup;

pub use catalog::{CardCatalog, CardRecord};
pub use error::{CatalogError, FeedbackError, FetchError, ModelError, StartupError};
pub use feedback::{FeedbackLog, Verdict};
pub use fetch::{ArtifactFetcher, Fetched};
pub use model::{classify_load_failure, LoadFailure, ModelSpec, Prediction, Predictor};
pub use onnx::OnnxPredictor;
pub use startup::{prepare_model, ArtifactSources};
