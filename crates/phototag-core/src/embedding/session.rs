//! ONNX Runtime session management shared by the image backends.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Wraps an ONNX Runtime session that takes a single image tensor.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct ImageSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    path: PathBuf,
}

/// One named output tensor copied out of the session.
pub struct SessionOutput {
    pub shape: Vec<i64>,
    pub data: Vec<f32>,
}

impl ImageSession {
    /// Load a model from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        if !model_path.exists() {
            return Err(PipelineError::Model {
                path: model_path.to_path_buf(),
                message: "Model not found".to_string(),
            });
        }

        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to load ONNX model: {e}"),
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "pixel_values".to_string());

        tracing::debug!(
            "Loaded ONNX model from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            path: model_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the model on one tensor and copy out the first output whose name
    /// is in `preferred` (in preference order), or the first output if none match.
    pub fn run(
        &self,
        tensor: &Array4<f32>,
        preferred: &[&str],
    ) -> Result<SessionOutput, PipelineError> {
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| PipelineError::inference(format!("Failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| PipelineError::inference(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| PipelineError::inference(format!("ONNX inference failed: {e}")))?;

        let selected = preferred
            .iter()
            .find_map(|want| outputs.iter().find(|(name, _)| *name == *want))
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| PipelineError::inference("Model produced no outputs"))?;

        let (shape, data) = selected.1.try_extract_tensor::<f32>().map_err(|e| {
            PipelineError::inference(format!("Failed to extract {} tensor: {e}", selected.0))
        })?;

        Ok(SessionOutput {
            shape: shape.iter().copied().collect(),
            data: data.to_vec(),
        })
    }
}

impl SessionOutput {
    /// The single row of a `[1, D]` or `[D]` output.
    pub fn single_row(self) -> Result<Vec<f32>, PipelineError> {
        match self.shape.len() {
            1 => Ok(self.data),
            2 if self.shape[0] == 1 => Ok(self.data),
            _ => Err(PipelineError::inference(format!(
                "Unexpected output shape: {:?}",
                self.shape
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_accepts_batch_of_one() {
        let out = SessionOutput {
            shape: vec![1, 3],
            data: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(out.single_row().unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_single_row_accepts_flat() {
        let out = SessionOutput {
            shape: vec![2],
            data: vec![1.0, 2.0],
        };
        assert_eq!(out.single_row().unwrap().len(), 2);
    }

    #[test]
    fn test_single_row_rejects_batches() {
        let out = SessionOutput {
            shape: vec![2, 3],
            data: vec![0.0; 6],
        };
        let err = out.single_row().unwrap_err();
        assert!(matches!(err, PipelineError::Inference { .. }));
    }

    #[test]
    fn test_load_missing_model() {
        let err = ImageSession::load(Path::new("/nonexistent/model.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Model { .. }));
    }
}
