use serde_derive::{Deserialize, Serialize};

use super::analyzed_stroke::DEFAULT_DIRECTION_CHANGE_THRESHOLD;
use super::error::StrokeError;
use super::simplifier::DEFAULT_TOLERANCE;

/// Tunable constants of the recognition pipeline.
///
/// All of these were tuned by hand on mouse and touch input. Every field has a
/// default, so a TOML file only needs to list what it changes:
///
/// ```toml
/// [simplifier]
/// tolerance = 0.03
///
/// [classifier]
/// aspect_ratio = 2.5
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub simplifier: SimplifierConfig,
    pub features: FeatureConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimplifierConfig {
    // Douglas-Peucker tolerance in normalized surface units
    pub tolerance: f64,
}

impl Default for SimplifierConfig {
    fn default() -> SimplifierConfig {
        SimplifierConfig { tolerance: DEFAULT_TOLERANCE }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeatureConfig {
    // Radians
    pub direction_change_threshold: f64,
}

impl Default for FeatureConfig {
    fn default() -> FeatureConfig {
        FeatureConfig { direction_change_threshold: DEFAULT_DIRECTION_CHANGE_THRESHOLD }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    // Strokes must be straighter than this to be lines
    pub straightness_threshold: f64,
    // Strokes must turn fewer times than this to be lines
    pub max_direction_changes: usize,
    // How much longer a line's box must be along its axis than across it
    pub aspect_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> ClassifierConfig {
        ClassifierConfig {
            straightness_threshold: 0.9,
            max_direction_changes: 2,
            aspect_ratio: 2.0,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<PipelineConfig, StrokeError> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StrokeError> {
        let tolerance = self.simplifier.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(StrokeError::Config(format!("simplifier.tolerance must be a non-negative number, got {}", tolerance)));
        }
        let threshold = self.features.direction_change_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(StrokeError::Config(format!(
                "features.direction_change_threshold must be positive, got {}",
                threshold
            )));
        }
        let straightness = self.classifier.straightness_threshold;
        if !straightness.is_finite() {
            return Err(StrokeError::Config(format!("classifier.straightness_threshold must be finite, got {}", straightness)));
        }
        let ratio = self.classifier.aspect_ratio;
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(StrokeError::Config(format!("classifier.aspect_ratio must be at least 1, got {}", ratio)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.simplifier.tolerance, 0.05);
        assert_eq!(config.features.direction_change_threshold, PI / 12.0);
        assert_eq!(config.classifier.straightness_threshold, 0.9);
        assert_eq!(config.classifier.max_direction_changes, 2);
        assert_eq!(config.classifier.aspect_ratio, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml_str("[simplifier]\ntolerance = 0.03\n\n[classifier]\naspect_ratio = 2.5\n").unwrap();
        assert_eq!(config.simplifier.tolerance, 0.03);
        assert_eq!(config.classifier.aspect_ratio, 2.5);
        assert_eq!(config.classifier.max_direction_changes, 2);
        assert_eq!(config.features, FeatureConfig::default());
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(PipelineConfig::from_toml_str("[simplifier]\ntolerance = -1.0\n"), Err(StrokeError::Config(_))));
        assert!(matches!(PipelineConfig::from_toml_str("[classifier]\naspect_ratio = 0.5\n"), Err(StrokeError::Config(_))));
        assert!(matches!(
            PipelineConfig::from_toml_str("[features]\ndirection_change_threshold = 0.0\n"),
            Err(StrokeError::Config(_))
        ));
        assert!(matches!(PipelineConfig::from_toml_str("[simplifier]\ntolerance = \"wide\"\n"), Err(StrokeError::ConfigToml(_))));
    }
}
