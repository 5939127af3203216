//! Model backends behind the scorers.
//!
//! Each backend is a narrow trait so scoring and selection can be exercised
//! without model weights. The ONNX Runtime implementations live alongside:
//!
//! - [`OnnxClassifier`]: closed-set classifier, tensor → logits
//! - [`OnnxImageEncoder`]: visual tower of a joint-embedding model, tensor → embedding
//! - [`OnnxTextEncoder`]: text tower plus tokenizer, prompts → embeddings
//!
//! # Usage
//!
//! ```rust,ignore
//! use phototag_core::embedding::{ImageClassifier, OnnxClassifier};
//!
//! let classifier = OnnxClassifier::load(&config.classifier_dir())?;
//! let logits = classifier.classify(&tensor)?;
//! ```

pub(crate) mod classifier;
pub(crate) mod session;
pub(crate) mod text_encoder;
pub(crate) mod vision;

use ndarray::Array4;

use crate::error::PipelineError;

pub use classifier::OnnxClassifier;
pub use text_encoder::OnnxTextEncoder;
pub use vision::OnnxImageEncoder;

/// Fixed-class image classifier.
pub trait ImageClassifier: Send + Sync {
    /// Raw class scores for a single preprocessed image, one per class.
    fn classify(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, PipelineError>;
}

/// Image side of a joint image/text embedding model.
pub trait ImageEncoder: Send + Sync {
    /// L2-normalized embedding for a single preprocessed image.
    fn embed(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, PipelineError>;
}

/// Text side of a joint image/text embedding model.
pub trait TextEncoder: Send + Sync {
    /// L2-normalized embeddings, one per input text.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError>;
}
