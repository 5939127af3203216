//! Closed-set classifier exported to ONNX (e.g. torchvision ResNet-18).

use std::path::Path;

use ndarray::Array4;

use crate::error::PipelineError;

use super::session::ImageSession;
use super::ImageClassifier;

/// The classifier ONNX filename inside its model folder.
pub const CLASSIFIER_MODEL_FILENAME: &str = "model.onnx";

/// Output names tried in order; torchvision exports usually use `logits` or `output`.
const LOGIT_OUTPUTS: &[&str] = &["logits", "output"];

/// ONNX Runtime classifier producing one logit per class.
pub struct OnnxClassifier {
    session: ImageSession,
}

impl OnnxClassifier {
    /// Load `{model_dir}/model.onnx`.
    pub fn load(model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = Self::model_path(model_dir);
        let session = ImageSession::load(&model_path)?;
        tracing::info!("Loaded classifier from {:?}", session.path());
        Ok(Self { session })
    }

    pub fn model_path(model_dir: &Path) -> std::path::PathBuf {
        model_dir.join(CLASSIFIER_MODEL_FILENAME)
    }

    pub fn model_exists(model_dir: &Path) -> bool {
        Self::model_path(model_dir).exists()
    }
}

impl ImageClassifier for OnnxClassifier {
    fn classify(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, PipelineError> {
        self.session.run(tensor, LOGIT_OUTPUTS)?.single_row()
    }
}
