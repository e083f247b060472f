//! Multi-class classifiers over binary feature vectors.

mod decision_tree;
mod naive_bayes;

pub use decision_tree::DecisionTree;
pub use naive_bayes::NaiveBayes;

use super::features::FeatureVector;
use super::training::TrainingSet;
use crate::config::{EngineSettings, ModelKind};
use std::fmt;

/// A fitted classifier producing per-class probability estimates.
///
/// Probabilities are indexed by the label order of the [`TrainingSet`] the
/// classifier was fitted on and sum to 1.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Which algorithm this is.
    fn kind(&self) -> ModelKind;

    /// Number of classes.
    fn class_count(&self) -> usize;

    /// Class probability estimates for a single vector.
    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64>;
}

/// Fits the classifier selected by `settings` on `data`.
#[must_use]
pub fn fit(settings: &EngineSettings, data: &TrainingSet) -> Box<dyn Classifier> {
    match settings.model {
        ModelKind::DecisionTree => Box::new(DecisionTree::fit(data, settings.max_depth)),
        ModelKind::NaiveBayes => Box::new(NaiveBayes::fit(data)),
    }
}
