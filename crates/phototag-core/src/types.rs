//! Per-request data types flowing through the tagging pipeline.
//!
//! ```text
//! bytes → tensor → ScoreVector → TagResult
//! ```

use serde::{Deserialize, Serialize};

/// One probability per category, index-aligned with the `CategorySpace`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreVector(Vec<f32>);

impl ScoreVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    /// Scores in category index order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Category indices sorted by descending score.
    ///
    /// The sort is stable, so equal scores keep category order (lower index
    /// first). NaN sorts last.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.0.len()).collect();
        order.sort_by(|&a, &b| {
            let (sa, sb) = (self.0[a], self.0[b]);
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => sb.total_cmp(&sa),
            }
        });
        order
    }
}

impl From<Vec<f32>> for ScoreVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// Non-empty ordered list of tags returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagResult(Vec<String>);

impl TagResult {
    /// Build a result from selected tags, or `None` if the list is empty.
    pub fn new(tags: Vec<String>) -> Option<Self> {
        if tags.is_empty() {
            None
        } else {
            Some(Self(tags))
        }
    }

    /// Single-tag result.
    pub fn singleton(tag: impl Into<String>) -> Self {
        Self(vec![tag.into()])
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl TryFrom<Vec<String>> for TagResult {
    type Error = &'static str;

    fn try_from(tags: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(tags).ok_or("tag list must not be empty")
    }
}

impl From<TagResult> for Vec<String> {
    fn from(result: TagResult) -> Self {
        result.0
    }
}
