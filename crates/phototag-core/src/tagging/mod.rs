//! Category vocabulary, scoring strategies and tag selection.
//!
//! Images are scored against a [`CategorySpace`] by one of two [`Scorer`]s:
//! a closed-set classifier over a fixed class list, or a zero-shot scorer
//! over prompt embeddings. A [`SelectionPolicy`] then picks the final tags.

pub mod category_space;
pub mod curated;
pub mod label_bank;
pub mod scorer;
pub mod selector;

pub use category_space::{CategoryOrigin, CategorySpace, LabelSource};
pub use label_bank::LabelBank;
pub use scorer::{ClosedSetScorer, Scorer, ZeroShotScorer};
pub use selector::SelectionPolicy;
