//! The ordered label vocabulary images are scored against.
//!
//! Index position is load-bearing: score `i` always belongs to label `i`.
//! A [`CategorySpace`] is built once at startup and only read afterwards.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::curated::curated_phrases;

/// Where the labels of a loaded [`CategorySpace`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOrigin {
    /// Read from a line-delimited label file
    File(PathBuf),
    /// Built-in curated phrase list
    Curated,
    /// Placeholder `class_{i}` labels
    Synthetic,
}

impl CategoryOrigin {
    pub fn describe(&self) -> String {
        match self {
            CategoryOrigin::File(path) => format!("file {}", path.display()),
            CategoryOrigin::Curated => "curated list".to_string(),
            CategoryOrigin::Synthetic => "synthetic labels".to_string(),
        }
    }
}

/// What to build a [`CategorySpace`] from.
#[derive(Debug, Clone)]
pub enum LabelSource {
    /// Labels for a fixed-class model. The file must hold exactly
    /// `num_classes` lines; otherwise synthetic labels keep indices aligned.
    ClassLabels { path: PathBuf, num_classes: usize },
    /// Curated phrases, optionally replaced by a user-edited file.
    Curated { override_file: Option<PathBuf> },
}

/// Ordered, immutable sequence of unique labels.
#[derive(Debug, Clone)]
pub struct CategorySpace {
    labels: Vec<String>,
    by_label: HashMap<String, usize>,
    origin: CategoryOrigin,
}

impl CategorySpace {
    /// Materialize the vocabulary for a label source.
    ///
    /// Never fails: unreadable or mismatched files are logged and replaced by
    /// the curated list or synthetic labels.
    pub fn load(source: &LabelSource) -> Self {
        let space = match source {
            LabelSource::ClassLabels { path, num_classes } => {
                Self::load_class_labels(path, *num_classes)
            }
            LabelSource::Curated { override_file } => Self::load_curated(override_file.as_deref()),
        };

        tracing::info!(
            "Loaded {} categories from {}",
            space.len(),
            space.origin.describe()
        );
        space
    }

    fn load_class_labels(path: &Path, num_classes: usize) -> Self {
        match read_label_file(path) {
            Ok(labels) if labels.len() == num_classes => {
                Self::from_class_labels(labels, CategoryOrigin::File(path.to_path_buf()))
            }
            Ok(labels) => {
                let err = ConfigError::LabelCountMismatch {
                    path: path.to_path_buf(),
                    expected: num_classes,
                    found: labels.len(),
                };
                tracing::warn!("{err}. Using synthetic labels.");
                Self::synthetic(num_classes)
            }
            Err(e) => {
                tracing::warn!(
                    "Label file {:?} unavailable ({e}). Using synthetic labels.",
                    path
                );
                Self::synthetic(num_classes)
            }
        }
    }

    fn load_curated(override_file: Option<&Path>) -> Self {
        let Some(path) = override_file else {
            return Self::curated();
        };

        match read_label_file(path) {
            Ok(labels) if !labels.is_empty() => {
                Self::from_phrases(labels, CategoryOrigin::File(path.to_path_buf()))
            }
            Ok(_) => {
                tracing::warn!("Category file {:?} is empty. Using curated list.", path);
                Self::curated()
            }
            Err(e) => {
                tracing::warn!(
                    "Category file {:?} unavailable ({e}). Using curated list.",
                    path
                );
                Self::curated()
            }
        }
    }

    /// The built-in curated phrase list.
    pub fn curated() -> Self {
        let labels = curated_phrases().map(str::to_string).collect();
        Self::from_phrases(labels, CategoryOrigin::Curated)
    }

    /// Placeholder labels `class_0..class_{n-1}`.
    pub fn synthetic(n: usize) -> Self {
        let labels = (0..n).map(|i| format!("class_{i}")).collect();
        Self::build(labels, CategoryOrigin::Synthetic)
    }

    /// Build from labels whose indices must not move.
    ///
    /// A repeated label is renamed `"{label} ({index})"` instead of being dropped.
    /// If that name is taken too, ` ({index})` is appended until it is unique.
    pub fn from_class_labels(labels: Vec<String>, origin: CategoryOrigin) -> Self {
        let mut seen = HashSet::new();
        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                if seen.insert(label.clone()) {
                    label
                } else {
                    let mut renamed = format!("{label} ({i})");
                    while !seen.insert(renamed.clone()) {
                        renamed = format!("{renamed} ({i})");
                    }
                    tracing::warn!(
                        "{}; renamed index {i} to {renamed:?}",
                        ConfigError::DuplicateCategory(label)
                    );
                    renamed
                }
            })
            .collect();
        Self::build(labels, origin)
    }

    /// Build from free-form phrases. Later repeats are dropped.
    pub fn from_phrases(labels: Vec<String>, origin: CategoryOrigin) -> Self {
        let mut seen = HashSet::new();
        let labels = labels
            .into_iter()
            .filter(|label| {
                let fresh = seen.insert(label.clone());
                if !fresh {
                    tracing::warn!("{}; dropped", ConfigError::DuplicateCategory(label.clone()));
                }
                fresh
            })
            .collect();
        Self::build(labels, origin)
    }

    fn build(labels: Vec<String>, origin: CategoryOrigin) -> Self {
        let by_label = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self {
            labels,
            by_label,
            origin,
        }
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label at index `i`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.labels.get(i).map(String::as_str)
    }

    /// Index of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn origin(&self) -> &CategoryOrigin {
        &self.origin
    }
}

/// Read a UTF-8 label file: one label per line, trimmed, blank lines skipped.
pub fn read_label_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn label_file(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        (dir, path)
    }

    #[test]
    fn test_load_class_labels_preserves_file_order() {
        let (_dir, path) = label_file(&["  cat ", "dog", "car"]);
        let space = CategorySpace::load(&LabelSource::ClassLabels {
            path: path.clone(),
            num_classes: 3,
        });

        assert_eq!(space.labels(), &["cat", "dog", "car"]);
        assert_eq!(space.origin(), &CategoryOrigin::File(path));
        assert_eq!(space.index_of("dog"), Some(1));
    }

    #[test]
    fn test_missing_label_file_falls_back_to_synthetic() {
        let space = CategorySpace::load(&LabelSource::ClassLabels {
            path: PathBuf::from("/nonexistent/imagenet_classes.txt"),
            num_classes: 1000,
        });

        assert_eq!(space.len(), 1000);
        assert_eq!(space.get(0), Some("class_0"));
        assert_eq!(space.get(999), Some("class_999"));
        assert_eq!(space.origin(), &CategoryOrigin::Synthetic);
    }

    #[test]
    fn test_count_mismatch_falls_back_to_synthetic() {
        let (_dir, path) = label_file(&["cat", "dog", "car"]);
        let space = CategorySpace::load(&LabelSource::ClassLabels {
            path,
            num_classes: 5,
        });

        assert_eq!(space.len(), 5);
        assert_eq!(space.get(4), Some("class_4"));
        assert_eq!(space.origin(), &CategoryOrigin::Synthetic);
    }

    #[test]
    fn test_class_label_duplicates_keep_index() {
        let (_dir, path) = label_file(&["crane", "heron", "crane"]);
        let space = CategorySpace::load(&LabelSource::ClassLabels {
            path,
            num_classes: 3,
        });

        assert_eq!(space.labels(), &["crane", "heron", "crane (2)"]);
        assert_eq!(space.index_of("crane"), Some(0));
        assert_eq!(space.index_of("crane (2)"), Some(2));
    }

    #[test]
    fn test_renamed_duplicate_does_not_collide() {
        let space = CategorySpace::from_class_labels(
            vec!["x".into(), "x (2)".into(), "x".into()],
            CategoryOrigin::Synthetic,
        );

        assert_eq!(space.labels(), &["x", "x (2)", "x (2) (2)"]);
        assert_eq!(space.index_of("x (2)"), Some(1));
        assert_eq!(space.index_of("x (2) (2)"), Some(2));

        let unique: HashSet<&String> = space.labels().iter().collect();
        assert_eq!(unique.len(), space.len());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let (_dir, path) = label_file(&["cat", "", "   ", "dog"]);
        let labels = read_label_file(&path).unwrap();
        assert_eq!(labels, vec!["cat", "dog"]);
    }

    #[test]
    fn test_curated_without_override() {
        let space = CategorySpace::load(&LabelSource::Curated {
            override_file: None,
        });

        assert_eq!(space.origin(), &CategoryOrigin::Curated);
        assert_eq!(space.len(), curated_phrases().count());
        assert_eq!(space.get(0), Some("portrait"));
    }

    #[test]
    fn test_curated_override_file_drops_duplicates() {
        let (_dir, path) = label_file(&["beach", "sunset", "beach", "dog"]);
        let space = CategorySpace::load(&LabelSource::Curated {
            override_file: Some(path.clone()),
        });

        assert_eq!(space.labels(), &["beach", "sunset", "dog"]);
        assert_eq!(space.origin(), &CategoryOrigin::File(path));
    }

    #[test]
    fn test_curated_missing_override_uses_builtin() {
        let space = CategorySpace::load(&LabelSource::Curated {
            override_file: Some(PathBuf::from("/nonexistent/categories.txt")),
        });
        assert_eq!(space.origin(), &CategoryOrigin::Curated);
        assert!(!space.is_empty());
    }

    #[test]
    fn test_curated_empty_override_uses_builtin() {
        let (_dir, path) = label_file(&[]);
        let space = CategorySpace::load(&LabelSource::Curated {
            override_file: Some(path),
        });
        assert_eq!(space.origin(), &CategoryOrigin::Curated);
    }

    #[test]
    fn test_labels_are_unique() {
        let space = CategorySpace::curated();
        let unique: HashSet<&String> = space.labels().iter().collect();
        assert_eq!(unique.len(), space.len());
    }
}
