//! Visual encoder of a joint image/text embedding model (CLIP family).

use std::path::{Path, PathBuf};

use ndarray::Array4;

use crate::error::PipelineError;

use super::session::ImageSession;
use super::ImageEncoder;

/// The visual encoder ONNX filename.
pub const VISUAL_MODEL_FILENAME: &str = "visual.onnx";

/// Projected embedding outputs, most specific first. `last_hidden_state` is
/// not aligned across modalities and is never used.
const EMBEDDING_OUTPUTS: &[&str] = &["image_embeds", "pooler_output"];

/// ONNX Runtime visual encoder.
pub struct OnnxImageEncoder {
    session: ImageSession,
}

impl OnnxImageEncoder {
    /// Load `{model_dir}/visual.onnx`.
    pub fn load(model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = Self::model_path(model_dir);
        tracing::info!("Loading visual encoder from {:?}", model_path);
        let session = ImageSession::load(&model_path)?;
        tracing::info!("Visual encoder loaded successfully");
        Ok(Self { session })
    }

    pub fn model_path(model_dir: &Path) -> PathBuf {
        model_dir.join(VISUAL_MODEL_FILENAME)
    }
}

impl ImageEncoder for OnnxImageEncoder {
    fn embed(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, PipelineError> {
        let mut raw = self.session.run(tensor, EMBEDDING_OUTPUTS)?.single_row()?;
        crate::math::l2_normalize_in_place(&mut raw);
        Ok(raw)
    }
}
