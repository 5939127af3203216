//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.limits.max_body_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_body_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }

        let classifier = &self.classifier;
        if classifier.num_classes == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.num_classes must be > 0".into(),
            ));
        }
        if classifier.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.top_k must be > 0".into(),
            ));
        }
        if classifier.crop == 0 || classifier.crop > classifier.resize {
            return Err(ConfigError::ValidationError(
                "classifier.crop must be > 0 and <= classifier.resize".into(),
            ));
        }
        if classifier.fallback_tags.is_empty() {
            return Err(ConfigError::ValidationError(
                "classifier.fallback_tags must not be empty".into(),
            ));
        }

        let zero_shot = &self.zero_shot;
        if zero_shot.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "zero_shot.image_size must be > 0".into(),
            ));
        }
        if zero_shot.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "zero_shot.top_k must be > 0".into(),
            ));
        }
        if zero_shot.text_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "zero_shot.text_batch_size must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&zero_shot.min_confidence) {
            return Err(ConfigError::ValidationError(
                "zero_shot.min_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        if !(zero_shot.logit_scale.is_finite() && zero_shot.logit_scale > 0.0) {
            return Err(ConfigError::ValidationError(
                "zero_shot.logit_scale must be finite and > 0".into(),
            ));
        }
        if !zero_shot.prompt_template.contains("{}") {
            return Err(ConfigError::ValidationError(
                "zero_shot.prompt_template must contain `{}`".into(),
            ));
        }
        if zero_shot.fallback_tags.is_empty() {
            return Err(ConfigError::ValidationError(
                "zero_shot.fallback_tags must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        config.zero_shot.top_k = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("zero_shot.top_k"));
    }

    #[test]
    fn test_validate_rejects_crop_larger_than_resize() {
        let mut config = Config::default();
        config.classifier.crop = 300;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("classifier.crop"));
    }

    #[test]
    fn test_validate_rejects_invalid_min_confidence() {
        let mut config = Config::default();
        config.zero_shot.min_confidence = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));

        config.zero_shot.min_confidence = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.zero_shot.prompt_template = "a photo".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("prompt_template"));
    }

    #[test]
    fn test_validate_rejects_non_finite_logit_scale() {
        for scale in [f32::NAN, f32::INFINITY, 0.0, -1.0] {
            let mut config = Config::default();
            config.zero_shot.logit_scale = scale;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("logit_scale"), "{scale}");
        }
    }

    #[test]
    fn test_validate_rejects_empty_fallback() {
        let mut config = Config::default();
        config.classifier.fallback_tags.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_tags"));
    }
}
