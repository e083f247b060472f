//! Bernoulli naive Bayes with Laplace smoothing.
//!
//! Unlike a fully grown tree, every feature contributes to every class score,
//! so overlapping symptom patterns are separated by relative weight.

use super::Classifier;
use crate::config::ModelKind;
use crate::engine::features::FeatureVector;
use crate::engine::training::TrainingSet;

/// Additive smoothing applied to every feature count.
const SMOOTHING: f64 = 1.0;

/// A fitted Bernoulli naive Bayes model, stored in log space.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    log_prior: Vec<f64>,
    log_present: Vec<Vec<f64>>,
    log_absent: Vec<Vec<f64>>,
}

impl NaiveBayes {
    /// Fits per-class priors and per-feature presence probabilities.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(data: &TrainingSet) -> Self {
        let class_count = data.classes().len();
        let feature_count = data.feature_count();
        let mut class_totals = vec![0usize; class_count];
        let mut feature_totals = vec![vec![0usize; feature_count]; class_count];

        for (example, label) in data.examples().iter().zip(data.labels()) {
            class_totals[*label] += 1;
            for (feature, present) in example.as_slice().iter().enumerate() {
                if *present {
                    feature_totals[*label][feature] += 1;
                }
            }
        }

        let total = data.len() as f64;
        let mut log_prior = Vec::with_capacity(class_count);
        let mut log_present = Vec::with_capacity(class_count);
        let mut log_absent = Vec::with_capacity(class_count);

        for (class_total, counts) in class_totals.iter().zip(&feature_totals) {
            let n = *class_total as f64;
            log_prior.push(((n + SMOOTHING) / SMOOTHING.mul_add(class_count as f64, total)).ln());
            let probabilities: Vec<f64> = counts
                .iter()
                .map(|c| (*c as f64 + SMOOTHING) / 2.0f64.mul_add(SMOOTHING, n))
                .collect();
            log_present.push(probabilities.iter().map(|p| p.ln()).collect());
            log_absent.push(probabilities.iter().map(|p| (1.0 - p).ln()).collect());
        }

        Self {
            log_prior,
            log_present,
            log_absent,
        }
    }

    /// Unnormalized log posterior per class.
    fn log_scores(&self, features: &FeatureVector) -> Vec<f64> {
        self.log_prior
            .iter()
            .zip(self.log_present.iter().zip(&self.log_absent))
            .map(|(prior, (present, absent))| {
                prior
                    + present
                        .iter()
                        .zip(absent)
                        .enumerate()
                        .map(|(i, (p, a))| if features.get(i) { p } else { a })
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Classifier for NaiveBayes {
    fn kind(&self) -> ModelKind {
        ModelKind::NaiveBayes
    }

    fn class_count(&self) -> usize {
        self.log_prior.len()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let scores = self.log_scores(features);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return vec![0.0; exp.len()];
        }
        exp.into_iter().map(|e| e / sum).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(bits: &[bool]) -> FeatureVector {
        let mut v = FeatureVector::zeros(bits.len());
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                v.flip(i);
            }
        }
        v
    }

    fn overlapping_set() -> TrainingSet {
        // "a" = {0, 1}, "b" = {1, 2, 3}; feature 1 is shared.
        let a = vector(&[true, true, false, false]);
        let b = vector(&[false, true, true, true]);
        TrainingSet::from_examples(
            vec!["a".to_string(), "b".to_string()],
            vec![a.clone(), a.clone(), a, b.clone(), b.clone(), b],
            vec![0, 0, 0, 1, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_probabilities_are_normalized() {
        let model = NaiveBayes::fit(&overlapping_set());
        let proba = model.predict_proba(&vector(&[false, true, false, false]));
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_prototypes_rank_their_class_first() {
        let model = NaiveBayes::fit(&overlapping_set());
        let a = model.predict_proba(&vector(&[true, true, false, false]));
        let b = model.predict_proba(&vector(&[false, true, true, true]));
        assert!(a[0] > 0.9);
        assert!(b[1] > 0.9);
    }

    #[test]
    fn test_partial_overlap_prefers_closer_class() {
        let model = NaiveBayes::fit(&overlapping_set());
        // Shared feature plus one of b's own features.
        let proba = model.predict_proba(&vector(&[false, true, true, false]));
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn test_kind() {
        let model = NaiveBayes::fit(&overlapping_set());
        assert_eq!(model.kind(), ModelKind::NaiveBayes);
        assert_eq!(model.class_count(), 2);
    }
}
