//! Text encoder for rendering category prompts into the joint embedding space.
//!
//! Loads the text ONNX model and tokenizer, encodes strings to vectors aligned
//! with the visual encoder's space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

use super::TextEncoder;

pub const TEXT_MODEL_FILENAME: &str = "text_model.onnx";
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// CLIP context length.
const MAX_LENGTH: usize = 77;

const EMBEDDING_OUTPUTS: &[&str] = &["text_embeds", "pooler_output"];

/// ONNX Runtime text encoder.
///
/// Uses the same `Mutex<Session>` pattern as the image backends.
pub struct OnnxTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    /// Whether the exported graph takes an `attention_mask` input.
    wants_attention_mask: bool,
}

impl OnnxTextEncoder {
    /// Load the text encoder from the model directory.
    ///
    /// Expects `text_model.onnx` and `tokenizer.json` in `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self, PipelineError> {
        let text_model_path = model_dir.join(TEXT_MODEL_FILENAME);
        let tokenizer_path = model_dir.join(TOKENIZER_FILENAME);

        for path in [&text_model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(PipelineError::Model {
                    path: path.clone(),
                    message: "File not found".to_string(),
                });
            }
        }

        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                path: text_model_path.clone(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(&text_model_path)
            .map_err(|e| PipelineError::Model {
                path: text_model_path.clone(),
                message: format!("Failed to load text encoder model: {e}"),
            })?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            PipelineError::Model {
                path: tokenizer_path.clone(),
                message: format!("Failed to load tokenizer: {e}"),
            }
        })?;

        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded text encoder (inputs: {:?}, outputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            wants_attention_mask,
        })
    }

    /// Check whether the text encoder model files exist.
    pub fn model_exists(model_dir: &Path) -> bool {
        model_dir.join(TEXT_MODEL_FILENAME).exists() && model_dir.join(TOKENIZER_FILENAME).exists()
    }
}

/// Pack token ids into fixed-length rows padded with zeros.
///
/// Returns `(input_ids, attention_mask)`, both `batch × MAX_LENGTH` row-major.
fn pack_ids(rows: &[&[u32]]) -> (Vec<i64>, Vec<i64>) {
    let mut input_ids = vec![0i64; rows.len() * MAX_LENGTH];
    let mut attention_mask = vec![0i64; rows.len() * MAX_LENGTH];
    for (i, ids) in rows.iter().enumerate() {
        for (j, &id) in ids.iter().take(MAX_LENGTH).enumerate() {
            input_ids[i * MAX_LENGTH + j] = id as i64;
            attention_mask[i * MAX_LENGTH + j] = 1;
        }
    }
    (input_ids, attention_mask)
}

impl TextEncoder for OnnxTextEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| PipelineError::inference(format!("Tokenization failed: {e}")))?;
        let rows: Vec<&[u32]> = encodings.iter().map(|e| e.get_ids()).collect();
        let (input_ids, attention_mask) = pack_ids(&rows);
        let shape = vec![batch_size as i64, MAX_LENGTH as i64];

        let input_ids_value = Value::from_array((shape.clone(), input_ids))
            .map_err(|e| PipelineError::inference(format!("Failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PipelineError::inference(format!("Text encoder lock poisoned: {e}")))?;

        let outputs = (if self.wants_attention_mask {
            let mask_value = Value::from_array((shape, attention_mask)).map_err(|e| {
                PipelineError::inference(format!("Failed to create mask tensor: {e}"))
            })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_ids_value])
        })
        .map_err(|e| PipelineError::inference(format!("Text encoder inference failed: {e}")))?;

        let embeddings_output = EMBEDDING_OUTPUTS
            .iter()
            .find_map(|want| outputs.iter().find(|(name, _)| *name == *want))
            .ok_or_else(|| PipelineError::inference("Text encoder produced no embedding output"))?;

        let (shape, data) = embeddings_output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::inference(format!("Failed to extract embeddings: {e}")))?;

        let dim = match shape.len() {
            2 => shape[1] as usize,
            _ => {
                return Err(PipelineError::inference(format!(
                    "Unexpected text embedding shape: {:?}",
                    shape
                )))
            }
        };

        Ok(data
            .chunks(dim)
            .take(batch_size)
            .map(crate::math::l2_normalize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_ids_pads_and_masks() {
        let a: &[u32] = &[49406, 320, 49407];
        let b: &[u32] = &[49406, 49407];
        let (ids, mask) = pack_ids(&[a, b]);

        assert_eq!(ids.len(), 2 * MAX_LENGTH);
        assert_eq!(&ids[..3], &[49406, 320, 49407]);
        assert_eq!(ids[3], 0);
        assert_eq!(&ids[MAX_LENGTH..MAX_LENGTH + 2], &[49406, 49407]);
        assert_eq!(mask[..3].iter().sum::<i64>(), 3);
        assert_eq!(mask[MAX_LENGTH..].iter().sum::<i64>(), 2);
    }

    #[test]
    fn test_pack_ids_truncates() {
        let long: Vec<u32> = (0..100).collect();
        let (ids, mask) = pack_ids(&[long.as_slice()]);
        assert_eq!(ids.len(), MAX_LENGTH);
        assert_eq!(ids[MAX_LENGTH - 1], (MAX_LENGTH - 1) as i64);
        assert!(mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_model_exists_false_for_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!OnnxTextEncoder::model_exists(dir.path()));
    }
}
