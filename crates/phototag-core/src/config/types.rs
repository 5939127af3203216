//! Sub-configuration structs with service defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.phototag/models"),
        }
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Which scoring strategy the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed-vocabulary classifier, top-k without threshold
    #[default]
    ClosedSet,
    /// Joint-embedding scorer over curated category phrases
    ZeroShot,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ClosedSet => "closed-set",
            Strategy::ZeroShot => "zero-shot",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub strategy: Strategy,
}

/// Closed-set classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model folder name under `general.model_dir` (contains `model.onnx`)
    pub model: String,

    /// Line-delimited label file; relative paths resolve against the model folder
    pub labels_file: PathBuf,

    /// Number of classes the classifier was trained on
    pub num_classes: usize,

    /// Shorter-side resize target before cropping
    pub resize: u32,

    /// Square center-crop size fed to the model
    pub crop: u32,

    /// Number of tags returned per image
    pub top_k: usize,

    /// Tags returned when decoding fails
    pub fallback_tags: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "resnet18".to_string(),
            labels_file: PathBuf::from("imagenet_classes.txt"),
            num_classes: 1000,
            resize: 256,
            crop: 224,
            top_k: 3,
            fallback_tags: vec!["error".to_string(), "unknown".to_string()],
        }
    }
}

/// Zero-shot joint-embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroShotConfig {
    /// Model folder name under `general.model_dir`
    /// (contains `visual.onnx`, `text_model.onnx` and `tokenizer.json`)
    pub model: String,

    /// Square input size of the visual encoder
    pub image_size: u32,

    /// Prompt each category is rendered through; `{}` is replaced by the phrase
    pub prompt_template: String,

    /// Multiplier applied to cosine similarity before softmax
    pub logit_scale: f32,

    /// Maximum number of tags per image
    pub top_k: usize,

    /// A tag must score strictly above this probability to be kept
    pub min_confidence: f32,

    /// Optional line-delimited file replacing the curated category list
    pub categories_file: Option<PathBuf>,

    /// Tags returned when nothing clears the threshold or decoding fails
    pub fallback_tags: Vec<String>,

    /// Prompts per text-encoder call while building the label bank
    pub text_batch_size: usize,
}

impl Default for ZeroShotConfig {
    fn default() -> Self {
        Self {
            model: "clip-vit-base-patch32".to_string(),
            image_size: 224,
            prompt_template: "a photo of {}".to_string(),
            logit_scale: 100.0,
            top_k: 8,
            min_confidence: 0.12,
            categories_file: None,
            fallback_tags: vec!["photo".to_string()],
            text_batch_size: 64,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in megabytes
    pub max_body_mb: usize,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_mb: 20,
            max_image_dimension: 10000,
        }
    }
}

impl LimitsConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb * 1024 * 1024
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
