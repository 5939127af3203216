//! Error types for the Phototag inference pipeline.
//!
//! Errors are split by lifetime: [`ConfigError`] happens once at startup and is
//! recovered locally (the vocabulary degrades), while [`PipelineError`] happens
//! per request and is turned into a fallback tag list at the request boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Phototag operations.
#[derive(Error, Debug)]
pub enum TaggerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a config or label file from disk
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Label file does not line up with the classifier's output
    #[error("Label file {path:?} has {found} labels, classifier expects {expected}")]
    LabelCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// The same category phrase appears twice in a vocabulary
    #[error("Duplicate category: {0:?}")]
    DuplicateCategory(String),
}

/// Per-request pipeline errors, plus model loading at startup.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Request carried no body
    #[error("Request body is empty")]
    EmptyRequest,

    /// Bytes are not a decodable image
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Model execution failed
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// Model weights could not be loaded
    #[error("Model error for {path:?}: {message}")]
    Model { path: PathBuf, message: String },
}

impl PipelineError {
    /// Shorthand for an inference failure.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Whether the failure was caused by the uploaded bytes rather than the model.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyRequest | Self::Decode { .. } | Self::ImageTooLarge { .. }
        )
    }
}

/// Convenience type alias for Phototag results.
pub type Result<T> = std::result::Result<T, TaggerError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_classified() {
        assert!(PipelineError::EmptyRequest.is_input_error());
        assert!(PipelineError::Decode {
            message: "bad".into()
        }
        .is_input_error());
        assert!(PipelineError::ImageTooLarge {
            width: 1,
            height: 1,
            max_dim: 0
        }
        .is_input_error());
        assert!(!PipelineError::inference("boom").is_input_error());
    }

    #[test]
    fn test_label_count_mismatch_message() {
        let err = ConfigError::LabelCountMismatch {
            path: PathBuf::from("labels.txt"),
            expected: 1000,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000"));
        assert!(msg.contains("3 labels"));
    }
}
