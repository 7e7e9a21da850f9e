//! Configuration file support for Pokedex
//!
//! Supports both YAML and TOML configuration files.
//!
//! # Example YAML configuration:
//! ```yaml
//! # Pokedex configuration file
//!
//! server:
//!   bind: "0.0.0.0"
//!   port: 80
//!   max_upload_bytes: 16777216
//!
//! # Model artifacts, downloaded once when missing
//! model:
//!   url: "https://pokedexproject.s3.eu-west-2.amazonaws.com/export.onnx"
//!   path: export.onnx
//!   labels_url: "https://pokedexproject.s3.eu-west-2.amazonaws.com/classes.json"
//!   labels_path: classes.json
//!   input_size: 224
//!
//! cards:
//!   path: cards.json
//!
//! feedback:
//!   path: feedback.csv
//!
//! logging:
//!   level: info
//!   format: json
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use pokedex_runtime::{ArtifactSources, ModelSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the published model lives unless configured otherwise
pub const DEFAULT_MODEL_URL: &str =
    "https://pokedexproject.s3.eu-west-2.amazonaws.com/export.onnx";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Card catalog configuration
    pub cards: CardsConfig,

    /// Feedback log configuration
    pub feedback: FeedbackConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,

    /// Server port
    pub port: u16,

    /// Largest accepted `/analyze` upload
    pub max_upload_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 80,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Remote location of the ONNX model
    pub url: String,

    /// Local model file; downloaded from `url` when missing
    pub path: PathBuf,

    /// Remote location of the class label file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_url: Option<String>,

    /// Local class label file (JSON array of strings)
    pub labels_path: PathBuf,

    /// Square model input edge in pixels
    pub input_size: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MODEL_URL.to_string(),
            path: PathBuf::from("export.onnx"),
            labels_url: None,
            labels_path: PathBuf::from("classes.json"),
            input_size: 224,
        }
    }
}

impl ModelConfig {
    pub fn sources(&self) -> ArtifactSources {
        ArtifactSources {
            model_url: self.url.clone(),
            labels_url: self.labels_url.clone(),
        }
    }

    pub fn spec(&self) -> ModelSpec {
        ModelSpec {
            model_path: self.path.clone(),
            labels_path: self.labels_path.clone(),
            input_size: self.input_size,
        }
    }
}

/// Card catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardsConfig {
    /// JSON snapshot of label -> card metadata
    pub path: PathBuf,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cards.json"),
        }
    }
}

/// Feedback log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Append-only `label,flag` file
    pub path: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("feedback.csv"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML, auto-detected by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let mut config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "toml" => Self::from_toml(&content),
            _ => {
                // Try YAML first, then TOML
                Self::from_yaml(&content).or_else(|_| Self::from_toml(&content))
            }
        }?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Make every relative file path relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.model.path,
            &mut self.model.labels_path,
            &mut self.cards.path,
            &mut self.feedback.path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, bind: Option<String>, port: Option<u16>) {
        if let Some(bind) = bind {
            self.server.bind = bind;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
    }

    /// Create an example configuration
    pub fn example() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
                ..Default::default()
            },
            model: ModelConfig {
                labels_url: Some(
                    "https://pokedexproject.s3.eu-west-2.amazonaws.com/classes.json".to_string(),
                ),
                path: PathBuf::from("/app/models/export.onnx"),
                labels_path: PathBuf::from("/app/models/classes.json"),
                ..Default::default()
            },
            cards: CardsConfig {
                path: PathBuf::from("/app/cards.json"),
            },
            feedback: FeedbackConfig {
                path: PathBuf::from("/app/data/feedback.csv"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
            },
        }
    }

    /// Generate example YAML configuration
    pub fn example_yaml() -> String {
        serde_yaml::to_string(&Self::example()).unwrap_or_default()
    }

    /// Generate example TOML configuration
    pub fn example_toml() -> String {
        toml::to_string_pretty(&Self::example()).unwrap_or_default()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
