//! The process-wide tagging context.
//!
//! A [`TaggingService`] owns everything expensive (model sessions, label bank,
//! category space) and is built exactly once before serving. Requests only
//! borrow it; nothing in here is mutated after construction.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::{Config, Strategy};
use crate::embedding::{OnnxClassifier, OnnxImageEncoder, OnnxTextEncoder};
use crate::error::{ConfigError, PipelineError, PipelineResult, Result};
use crate::pipeline::{PreprocessRecipe, Preprocessor};
use crate::tagging::{
    CategorySpace, ClosedSetScorer, LabelBank, LabelSource, Scorer, SelectionPolicy,
    ZeroShotScorer,
};
use crate::types::TagResult;

/// Static facts about the loaded service, reported by health checks.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub model: String,
    pub strategy: Strategy,
    pub categories: usize,
    pub category_source: String,
    pub description: String,
}

/// Immutable inference context shared by every request.
pub struct TaggingService {
    info: ServiceInfo,
    categories: CategorySpace,
    preprocessor: Preprocessor,
    scorer: Box<dyn Scorer>,
    policy: SelectionPolicy,
}

impl TaggingService {
    /// Load models and vocabulary for the configured strategy.
    ///
    /// Vocabulary problems degrade to curated or synthetic labels; missing
    /// model weights are an error.
    pub fn load(config: &Config) -> Result<Self> {
        let start = Instant::now();
        let service = match config.model.strategy {
            Strategy::ClosedSet => Self::load_closed_set(config)?,
            Strategy::ZeroShot => Self::load_zero_shot(config)?,
        };
        tracing::info!(
            "{} service ready in {:?}: {}",
            service.info.strategy,
            start.elapsed(),
            service.info.description
        );
        Ok(service)
    }

    fn load_closed_set(config: &Config) -> Result<Self> {
        let classifier_config = &config.classifier;
        let categories = CategorySpace::load(&LabelSource::ClassLabels {
            path: config.labels_path(),
            num_classes: classifier_config.num_classes,
        });

        let classifier = OnnxClassifier::load(&config.classifier_dir())?;
        let scorer = ClosedSetScorer::new(Box::new(classifier), classifier_config.num_classes);

        let preprocessor = Preprocessor::new(
            &config.limits,
            PreprocessRecipe::imagenet(classifier_config),
        );
        let policy =
            SelectionPolicy::top_k(classifier_config.top_k, fallback(&classifier_config.fallback_tags));
        let description = format!(
            "{} classifier over {} classes, top-{}",
            classifier_config.model,
            categories.len(),
            classifier_config.top_k
        );

        Self::from_parts(
            &classifier_config.model,
            Strategy::ClosedSet,
            description,
            categories,
            preprocessor,
            Box::new(scorer),
            policy,
        )
        .map_err(Into::into)
    }

    fn load_zero_shot(config: &Config) -> Result<Self> {
        let zero_shot = &config.zero_shot;
        let categories = CategorySpace::load(&LabelSource::Curated {
            override_file: config.categories_path(),
        });

        let model_dir = config.zero_shot_dir();
        let encoder = OnnxImageEncoder::load(&model_dir)?;
        let label_bank = {
            let text_encoder = OnnxTextEncoder::load(&model_dir)?;
            LabelBank::encode_all(
                &categories,
                &text_encoder,
                &zero_shot.prompt_template,
                zero_shot.text_batch_size,
            )?
        };
        let scorer = ZeroShotScorer::new(Box::new(encoder), label_bank, zero_shot.logit_scale);

        let preprocessor = Preprocessor::new(&config.limits, PreprocessRecipe::clip(zero_shot));
        let policy = SelectionPolicy::top_k_with_threshold(
            zero_shot.top_k,
            zero_shot.min_confidence,
            fallback(&zero_shot.fallback_tags),
        );
        let description = format!(
            "{} zero-shot over {} categories, top-{} above {}",
            zero_shot.model,
            categories.len(),
            zero_shot.top_k,
            zero_shot.min_confidence
        );

        Self::from_parts(
            &zero_shot.model,
            Strategy::ZeroShot,
            description,
            categories,
            preprocessor,
            Box::new(scorer),
            policy,
        )
        .map_err(Into::into)
    }

    /// Assemble a service from already-built parts.
    ///
    /// Fails if the scorer and category space disagree on the category count.
    pub fn from_parts(
        model: &str,
        strategy: Strategy,
        description: String,
        categories: CategorySpace,
        preprocessor: Preprocessor,
        scorer: Box<dyn Scorer>,
        policy: SelectionPolicy,
    ) -> std::result::Result<Self, ConfigError> {
        if scorer.category_count() != categories.len() {
            return Err(ConfigError::ValidationError(format!(
                "scorer produces {} scores but the category space has {} labels",
                scorer.category_count(),
                categories.len()
            )));
        }

        let info = ServiceInfo {
            model: model.to_string(),
            strategy,
            categories: categories.len(),
            category_source: categories.origin().describe(),
            description,
        };

        Ok(Self {
            info,
            categories,
            preprocessor,
            scorer,
            policy,
        })
    }

    /// Decode, score and select tags for one upload.
    pub fn tag(&self, bytes: &[u8]) -> PipelineResult<TagResult> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyRequest);
        }

        let start = Instant::now();
        let tensor = self.preprocessor.decode_and_normalize(bytes)?;
        let preprocess_time = start.elapsed();

        let scores = self.scorer.score(&tensor)?;
        if scores.len() != self.categories.len() {
            return Err(PipelineError::inference(format!(
                "Score vector has {} entries for {} categories",
                scores.len(),
                self.categories.len()
            )));
        }

        let tags = self.policy.select(&scores, &self.categories);
        tracing::debug!(
            "Tagged {} bytes in {:?} (preprocess {:?}): {:?}",
            bytes.len(),
            start.elapsed(),
            preprocess_time,
            tags.tags()
        );
        Ok(tags)
    }

    /// Run [`TaggingService::tag`] on the blocking thread pool.
    ///
    /// A panicked or cancelled task surfaces as an inference error.
    pub async fn tag_blocking(self: Arc<Self>, bytes: Vec<u8>) -> PipelineResult<TagResult> {
        tokio::task::spawn_blocking(move || self.tag(&bytes))
            .await
            .map_err(|e| PipelineError::inference(format!("Task join error: {e}")))?
    }

    /// Tags returned when an upload cannot be tagged.
    pub fn fallback(&self) -> &TagResult {
        self.policy.fallback()
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    pub fn categories(&self) -> &CategorySpace {
        &self.categories
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }
}

fn fallback(tags: &[String]) -> TagResult {
    TagResult::new(tags.to_vec()).unwrap_or_else(|| TagResult::singleton("photo"))
}
