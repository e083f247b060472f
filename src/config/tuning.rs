//! Tuning settings for the diagnostic engine and tip personalizer.
//!
//! The numeric defaults carry no clinical meaning; they are kept as named,
//! overridable values.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Classifier backing the diagnostic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// CART decision tree with Gini impurity.
    #[default]
    DecisionTree,
    /// Bernoulli naive Bayes with Laplace smoothing.
    NaiveBayes,
}

impl ModelKind {
    /// Returns the model kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DecisionTree => "decision_tree",
            Self::NaiveBayes => "naive_bayes",
        }
    }

    /// Parses a model kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "decision_tree" | "tree" => Some(Self::DecisionTree),
            "naive_bayes" | "bayes" => Some(Self::NaiveBayes),
            _ => None,
        }
    }
}

/// Diagnostic engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Classifier to train.
    pub model: ModelKind,
    /// Synthetic examples generated per condition.
    pub samples_per_condition: usize,
    /// Independent per-bit flip probability applied to each example.
    pub noise_probability: f64,
    /// Minimum class probability (0-1) for a condition to be reported.
    pub confidence_threshold: f64,
    /// Maximum number of ranked results returned.
    pub max_results: usize,
    /// Maximum decision tree depth (`None` grows the tree fully).
    pub max_depth: Option<usize>,
    /// Seed for noise injection (`None` seeds from OS entropy).
    pub seed: Option<u64>,
}

impl EngineSettings {
    /// Default examples per condition.
    pub const DEFAULT_SAMPLES_PER_CONDITION: usize = 5;
    /// Default per-bit noise probability.
    pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.1;
    /// Default reporting threshold.
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.10;
    /// Default number of results kept.
    pub const DEFAULT_MAX_RESULTS: usize = 3;

    /// Sets the model kind.
    #[must_use]
    pub const fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Sets a fixed noise seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of synthetic examples per condition.
    #[must_use]
    pub const fn with_samples_per_condition(mut self, samples: usize) -> Self {
        self.samples_per_condition = samples;
        self
    }

    /// Sets the noise probability.
    #[must_use]
    pub const fn with_noise_probability(mut self, probability: f64) -> Self {
        self.noise_probability = probability;
        self
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_condition == 0 {
            return Err(Error::InvalidInput(
                "engine.samples_per_condition must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(Error::InvalidInput(format!(
                "engine.noise_probability must be within [0, 1], got {}",
                self.noise_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidInput(format!(
                "engine.confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_results == 0 {
            return Err(Error::InvalidInput(
                "engine.max_results must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidInput(
                "engine.max_depth must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            samples_per_condition: Self::DEFAULT_SAMPLES_PER_CONDITION,
            noise_probability: Self::DEFAULT_NOISE_PROBABILITY,
            confidence_threshold: Self::DEFAULT_CONFIDENCE_THRESHOLD,
            max_results: Self::DEFAULT_MAX_RESULTS,
            max_depth: None,
            seed: None,
        }
    }
}

/// Tip personalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipSettings {
    /// Upper bound on returned tips.
    pub max_tips: usize,
    /// Condition-specific tips below this count trigger general padding.
    pub specific_floor: usize,
    /// Minimum number of general tips added when padding.
    pub padding_floor: usize,
    /// Condition-specific tips taken per matched condition.
    pub tips_per_condition: usize,
    /// Most recent distinct conditions considered.
    pub recent_conditions: usize,
}

impl TipSettings {
    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.max_tips == 0 {
            return Err(Error::InvalidInput(
                "tips.max_tips must be at least 1".to_string(),
            ));
        }
        if self.recent_conditions == 0 {
            return Err(Error::InvalidInput(
                "tips.recent_conditions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of general tips appended when `specific` condition tips were found.
    ///
    /// Zero once `specific` reaches the floor; otherwise
    /// `max(padding_floor, max_tips - specific)`.
    #[must_use]
    pub const fn padding_for(&self, specific: usize) -> usize {
        if specific >= self.specific_floor {
            return 0;
        }
        let remaining = self.max_tips.saturating_sub(specific);
        if remaining > self.padding_floor {
            remaining
        } else {
            self.padding_floor
        }
    }
}

impl Default for TipSettings {
    fn default() -> Self {
        Self {
            max_tips: 8,
            specific_floor: 3,
            padding_floor: 3,
            tips_per_condition: 2,
            recent_conditions: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parse() {
        assert_eq!(ModelKind::parse("decision_tree"), Some(ModelKind::DecisionTree));
        assert_eq!(ModelKind::parse("Naive-Bayes"), Some(ModelKind::NaiveBayes));
        assert_eq!(ModelKind::parse("svm"), None);
        for kind in [ModelKind::DecisionTree, ModelKind::NaiveBayes] {
            assert_eq!(ModelKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_engine_defaults_validate() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.samples_per_condition, 5);
        assert!((settings.confidence_threshold - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_engine_validation_errors() {
        let bad = [
            EngineSettings::default().with_samples_per_condition(0),
            EngineSettings::default().with_noise_probability(1.5),
            EngineSettings {
                confidence_threshold: -0.1,
                ..EngineSettings::default()
            },
            EngineSettings {
                max_results: 0,
                ..EngineSettings::default()
            },
            EngineSettings {
                max_depth: Some(0),
                ..EngineSettings::default()
            },
        ];
        for settings in bad {
            assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_padding_for() {
        let tips = TipSettings::default();
        assert_eq!(tips.padding_for(0), 8);
        assert_eq!(tips.padding_for(1), 7);
        assert_eq!(tips.padding_for(2), 6);
        assert_eq!(tips.padding_for(3), 0);
        assert_eq!(tips.padding_for(6), 0);

        let small = TipSettings {
            max_tips: 4,
            specific_floor: 3,
            padding_floor: 3,
            ..TipSettings::default()
        };
        assert_eq!(small.padding_for(2), 3);
    }

    #[test]
    fn test_tip_validation() {
        assert!(TipSettings::default().validate().is_ok());
        let bad = TipSettings {
            max_tips: 0,
            ..TipSettings::default()
        };
        assert!(bad.validate().is_err());
    }
}
