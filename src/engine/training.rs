//! Synthetic training data with injected label noise.
//!
//! Every condition contributes `samples_per_condition` copies of its
//! characteristic indicator vector, each bit independently flipped with
//! probability `noise_probability`. Nothing here is persisted.

use super::features::FeatureVector;
use crate::models::{KnowledgeBase, Vocabulary};
use crate::{Error, Result};
use rand::Rng;

/// Labeled examples plus the class order they are labeled against.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    classes: Vec<String>,
    examples: Vec<FeatureVector>,
    labels: Vec<usize>,
    feature_count: usize,
}

impl TrainingSet {
    /// Synthesizes a noisy training set from the knowledge base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VocabularyMismatch`] if the knowledge base was built
    /// against a different vocabulary, or [`Error::InvalidInput`] if the noise
    /// probability is outside `[0, 1]`.
    pub fn synthesize<R: Rng + ?Sized>(
        vocabulary: &Vocabulary,
        knowledge_base: &KnowledgeBase,
        samples_per_condition: usize,
        noise_probability: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise_probability) {
            return Err(Error::InvalidInput(format!(
                "noise probability must be within [0, 1], got {noise_probability}"
            )));
        }
        if knowledge_base.vocabulary_fingerprint() != vocabulary.fingerprint() {
            return Err(Error::VocabularyMismatch {
                expected: knowledge_base.vocabulary_fingerprint().to_string(),
                found: vocabulary.fingerprint().to_string(),
            });
        }

        let feature_count = vocabulary.len();
        let mut classes = Vec::with_capacity(knowledge_base.len());
        let mut examples = Vec::with_capacity(knowledge_base.len() * samples_per_condition);
        let mut labels = Vec::with_capacity(examples.capacity());

        for (label, (condition, symptoms)) in knowledge_base.conditions().iter().enumerate() {
            classes.push(condition.clone());
            let prototype = FeatureVector::from_symptoms(vocabulary, symptoms);
            for _ in 0..samples_per_condition {
                let mut sample = prototype.clone();
                for index in 0..feature_count {
                    if rng.gen_bool(noise_probability) {
                        sample.flip(index);
                    }
                }
                examples.push(sample);
                labels.push(label);
            }
        }

        tracing::debug!(
            classes = classes.len(),
            examples = examples.len(),
            feature_count,
            noise_probability,
            "Synthesized training set"
        );

        Ok(Self {
            classes,
            examples,
            labels,
            feature_count,
        })
    }

    /// Builds a training set from explicit examples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if lengths disagree, a label is out of
    /// range, or there are no examples.
    pub fn from_examples(
        classes: Vec<String>,
        examples: Vec<FeatureVector>,
        labels: Vec<usize>,
    ) -> Result<Self> {
        if examples.is_empty() || examples.len() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "expected matching non-empty examples and labels, got {} and {}",
                examples.len(),
                labels.len()
            )));
        }
        let feature_count = examples[0].len();
        if examples.iter().any(|e| e.len() != feature_count) {
            return Err(Error::InvalidInput(
                "all examples must have the same length".to_string(),
            ));
        }
        if labels.iter().any(|l| *l >= classes.len()) {
            return Err(Error::InvalidInput("label out of range".to_string()));
        }
        Ok(Self {
            classes,
            examples,
            labels,
            feature_count,
        })
    }

    /// Class names, indexed by label.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Feature vectors.
    #[must_use]
    pub fn examples(&self) -> &[FeatureVector] {
        &self.examples
    }

    /// Labels, parallel to [`Self::examples`].
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Feature-vector length.
    #[must_use]
    pub const fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True if there are no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
