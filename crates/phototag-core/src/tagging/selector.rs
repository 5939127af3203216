//! Turns a score vector into the final tag list.
//!
//! Two policies share one implementation: top-k only (closed-set) and
//! top-k with a strict confidence threshold (zero-shot). Either way the
//! result is never empty.

use crate::types::{ScoreVector, TagResult};

use super::category_space::CategorySpace;

/// Top-k selection with an optional confidence threshold.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    top_k: usize,
    min_confidence: Option<f32>,
    fallback: TagResult,
}

impl SelectionPolicy {
    /// Keep the `top_k` best categories regardless of confidence.
    pub fn top_k(top_k: usize, fallback: TagResult) -> Self {
        Self {
            top_k,
            min_confidence: None,
            fallback,
        }
    }

    /// Keep up to `top_k` categories whose score is strictly above `min_confidence`.
    pub fn top_k_with_threshold(top_k: usize, min_confidence: f32, fallback: TagResult) -> Self {
        Self {
            top_k,
            min_confidence: Some(min_confidence),
            fallback,
        }
    }

    pub fn k(&self) -> usize {
        self.top_k
    }

    pub fn min_confidence(&self) -> Option<f32> {
        self.min_confidence
    }

    /// Result substituted when nothing is selected.
    pub fn fallback(&self) -> &TagResult {
        &self.fallback
    }

    /// Indices of the selected categories, best first.
    ///
    /// Every index is in `[0, scores.len())`.
    pub fn select_indices(&self, scores: &ScoreVector) -> Vec<usize> {
        let slice = scores.as_slice();
        scores
            .ranked()
            .into_iter()
            .take(self.top_k)
            .filter(|&i| match self.min_confidence {
                Some(threshold) => slice[i] > threshold,
                None => true,
            })
            .collect()
    }

    /// Select tags for a score vector aligned with `categories`.
    pub fn select(&self, scores: &ScoreVector, categories: &CategorySpace) -> TagResult {
        debug_assert_eq!(scores.len(), categories.len());

        let tags: Vec<String> = self
            .select_indices(scores)
            .into_iter()
            .filter_map(|i| categories.get(i).map(str::to_string))
            .collect();

        TagResult::new(tags).unwrap_or_else(|| self.fallback.clone())
    }
}
