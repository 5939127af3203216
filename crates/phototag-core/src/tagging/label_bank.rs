//! Pre-computed prompt embeddings for zero-shot scoring.
//!
//! The label bank stores a flat N×D matrix of text embeddings, one row per
//! category in `CategorySpace` order, so scoring an image is N dot products.

use crate::embedding::TextEncoder;
use crate::error::PipelineError;

use super::category_space::CategorySpace;

/// Pre-computed category embeddings.
///
/// Stores a single flat matrix (N × D, row-major) for efficient dot product.
#[derive(Clone, Debug)]
pub struct LabelBank {
    /// Flat matrix: N × D stored row-major.
    matrix: Vec<f32>,
    embedding_dim: usize,
    term_count: usize,
}

impl LabelBank {
    /// Create a label bank from a pre-computed matrix.
    ///
    /// Rows must already be L2-normalized.
    pub fn from_raw(
        matrix: Vec<f32>,
        embedding_dim: usize,
        term_count: usize,
    ) -> Result<Self, PipelineError> {
        if matrix.len() != embedding_dim * term_count {
            return Err(PipelineError::inference(format!(
                "Matrix size ({}) does not match {} terms × {} dim",
                matrix.len(),
                term_count,
                embedding_dim,
            )));
        }
        Ok(Self {
            matrix,
            embedding_dim,
            term_count,
        })
    }

    /// Render every category through `template` and encode the prompts.
    ///
    /// `template` contains a single `{}` placeholder. Prompts are encoded
    /// `batch_size` at a time.
    pub fn encode_all(
        categories: &CategorySpace,
        text_encoder: &dyn TextEncoder,
        template: &str,
        batch_size: usize,
    ) -> Result<Self, PipelineError> {
        let prompts: Vec<String> = categories
            .labels()
            .iter()
            .map(|label| render_prompt(template, label))
            .collect();

        tracing::info!("Encoding {} category prompts...", prompts.len());

        let mut matrix: Vec<f32> = Vec::new();
        let mut embedding_dim = 0;
        for chunk in prompts.chunks(batch_size.max(1)) {
            let embeddings = text_encoder.encode_batch(chunk)?;
            if embeddings.len() != chunk.len() {
                return Err(PipelineError::inference(format!(
                    "Text encoder returned {} embeddings for {} prompts",
                    embeddings.len(),
                    chunk.len()
                )));
            }
            for emb in &embeddings {
                if embedding_dim == 0 {
                    embedding_dim = emb.len();
                    matrix.reserve(prompts.len() * embedding_dim);
                } else if emb.len() != embedding_dim {
                    return Err(PipelineError::inference(format!(
                        "Inconsistent text embedding size ({} vs {})",
                        emb.len(),
                        embedding_dim
                    )));
                }
                matrix.extend_from_slice(emb);
            }
        }

        let term_count = prompts.len();
        tracing::info!(
            "Label bank ready: {} categories x {} dims ({:.1} KB)",
            term_count,
            embedding_dim,
            (term_count * embedding_dim * 4) as f64 / 1_000.0
        );

        Ok(Self {
            matrix,
            embedding_dim,
            term_count,
        })
    }

    /// Cosine similarity of an L2-normalized embedding against every row.
    pub fn similarities(&self, embedding: &[f32]) -> Result<Vec<f32>, PipelineError> {
        if embedding.len() != self.embedding_dim {
            return Err(PipelineError::inference(format!(
                "Image embedding has {} dims, label bank has {}",
                embedding.len(),
                self.embedding_dim
            )));
        }
        Ok(self
            .matrix
            .chunks_exact(self.embedding_dim.max(1))
            .take(self.term_count)
            .map(|row| crate::math::dot(row, embedding))
            .collect())
    }

    /// Get the flat matrix.
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Get the number of categories in the bank.
    pub fn term_count(&self) -> usize {
        self.term_count
    }
}

/// Substitute `label` for the first `{}` in `template`.
pub fn render_prompt(template: &str, label: &str) -> String {
    template.replacen("{}", label, 1)
}
