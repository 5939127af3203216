//! Scorers map a preprocessed image to a probability per category.
//!
//! Both variants return a [`ScoreVector`] index-aligned with the
//! `CategorySpace` they were built for, so selection never needs to know
//! which one produced it.

use ndarray::Array4;

use crate::embedding::{ImageClassifier, ImageEncoder};
use crate::error::PipelineError;
use crate::math::softmax;
use crate::types::ScoreVector;

use super::label_bank::LabelBank;

/// Maps a preprocessed image tensor to a [`ScoreVector`].
pub trait Scorer: Send + Sync {
    /// Score one image. The result has exactly [`Scorer::category_count`] entries.
    fn score(&self, tensor: &Array4<f32>) -> Result<ScoreVector, PipelineError>;

    /// Number of categories this scorer produces scores for.
    fn category_count(&self) -> usize;
}

/// Fixed-vocabulary classifier scores.
///
/// Logits are passed through softmax so every score lies in [0, 1]; ranking
/// is unchanged.
pub struct ClosedSetScorer {
    classifier: Box<dyn ImageClassifier>,
    num_classes: usize,
}

impl ClosedSetScorer {
    pub fn new(classifier: Box<dyn ImageClassifier>, num_classes: usize) -> Self {
        Self {
            classifier,
            num_classes,
        }
    }
}

impl Scorer for ClosedSetScorer {
    fn score(&self, tensor: &Array4<f32>) -> Result<ScoreVector, PipelineError> {
        let logits = self.classifier.classify(tensor)?;
        if logits.len() != self.num_classes {
            return Err(PipelineError::inference(format!(
                "Classifier returned {} scores, expected {}",
                logits.len(),
                self.num_classes
            )));
        }
        Ok(ScoreVector::new(softmax(&logits)))
    }

    fn category_count(&self) -> usize {
        self.num_classes
    }
}

/// Joint-embedding scores against pre-encoded category prompts.
///
/// `softmax(logit_scale * cosine)` across categories, so scores sum to 1.
pub struct ZeroShotScorer {
    encoder: Box<dyn ImageEncoder>,
    label_bank: LabelBank,
    logit_scale: f32,
}

impl ZeroShotScorer {
    pub fn new(encoder: Box<dyn ImageEncoder>, label_bank: LabelBank, logit_scale: f32) -> Self {
        Self {
            encoder,
            label_bank,
            logit_scale,
        }
    }

    pub fn label_bank(&self) -> &LabelBank {
        &self.label_bank
    }

    /// Softmax over scaled cosine similarities.
    pub fn probabilities(&self, image_embedding: &[f32]) -> Result<Vec<f32>, PipelineError> {
        let logits: Vec<f32> = self
            .label_bank
            .similarities(image_embedding)?
            .into_iter()
            .map(|cosine| self.logit_scale * cosine)
            .collect();
        Ok(softmax(&logits))
    }
}

impl Scorer for ZeroShotScorer {
    fn score(&self, tensor: &Array4<f32>) -> Result<ScoreVector, PipelineError> {
        let embedding = self.encoder.embed(tensor)?;
        Ok(ScoreVector::new(self.probabilities(&embedding)?))
    }

    fn category_count(&self) -> usize {
        self.label_bank.term_count()
    }
}
