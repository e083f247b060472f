//! Diagnostic engine.
//!
//! The engine is trained exactly once, at construction, on a synthetic noisy
//! training set derived from the knowledge base. After that it only answers
//! queries; there is no retraining API.
//!
//! # Ranking
//!
//! For a reported symptom set the classifier yields one probability per
//! condition. Conditions above the confidence threshold are kept, sorted by
//! confidence descending (a stable sort, so ties keep class order) and
//! truncated to `max_results`.

pub mod classifier;
pub mod features;
pub mod training;

pub use classifier::{Classifier, DecisionTree, NaiveBayes};
pub use features::FeatureVector;
pub use training::TrainingSet;

use crate::config::{EngineSettings, ModelKind};
use crate::models::{DiagnosisResult, KnowledgeBase, Symptom, Vocabulary, display_name};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::instrument;

/// A trained symptom classifier bound to one vocabulary and knowledge base.
#[derive(Debug)]
pub struct DiagnosticEngine {
    vocabulary: Vocabulary,
    knowledge_base: KnowledgeBase,
    classes: Vec<String>,
    model: Box<dyn Classifier>,
    confidence_threshold: f64,
    max_results: usize,
}

impl DiagnosticEngine {
    /// Trains an engine on the built-in vocabulary and knowledge base.
    ///
    /// Noise is seeded from `settings.seed` when set, otherwise from OS
    /// entropy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the settings are out of range.
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        Self::with_knowledge_base(Vocabulary::builtin(), KnowledgeBase::builtin(), settings)
    }

    /// Trains an engine on a custom vocabulary and knowledge base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for out-of-range settings and
    /// [`Error::VocabularyMismatch`] if the knowledge base was built against a
    /// different vocabulary.
    pub fn with_knowledge_base(
        vocabulary: Vocabulary,
        knowledge_base: KnowledgeBase,
        settings: &EngineSettings,
    ) -> Result<Self> {
        let mut rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(vocabulary, knowledge_base, settings, &mut rng)
    }

    /// Trains an engine drawing noise from the supplied random source.
    ///
    /// `settings.seed` is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_knowledge_base`].
    #[instrument(skip_all, fields(model = settings.model.as_str()))]
    pub fn with_rng<R: Rng + ?Sized>(
        vocabulary: Vocabulary,
        knowledge_base: KnowledgeBase,
        settings: &EngineSettings,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        let start = Instant::now();

        let data = TrainingSet::synthesize(
            &vocabulary,
            &knowledge_base,
            settings.samples_per_condition,
            settings.noise_probability,
            rng,
        )?;
        let model = classifier::fit(settings, &data);

        tracing::info!(
            classes = data.classes().len(),
            examples = data.len(),
            duration_ms = start.elapsed().as_millis(),
            "Trained diagnostic engine"
        );

        Ok(Self {
            classes: data.classes().to_vec(),
            vocabulary,
            knowledge_base,
            model,
            confidence_threshold: settings.confidence_threshold,
            max_results: settings.max_results,
        })
    }

    /// Vocabulary the engine was trained on.
    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Knowledge base the engine was trained on.
    #[must_use]
    pub const fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Condition keys in class order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Classifier backing the engine.
    #[must_use]
    pub fn model_kind(&self) -> ModelKind {
        self.model.kind()
    }

    /// Checks that `vocabulary` is the one the model was trained on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VocabularyMismatch`] if the fingerprints differ.
    pub fn check_vocabulary(&self, vocabulary: &Vocabulary) -> Result<()> {
        if vocabulary.fingerprint() == self.vocabulary.fingerprint() {
            return Ok(());
        }
        Err(Error::VocabularyMismatch {
            expected: self.vocabulary.fingerprint().to_string(),
            found: vocabulary.fingerprint().to_string(),
        })
    }

    /// Ranks candidate conditions for the reported symptoms.
    ///
    /// Never fails: empty input, or input with no symptom from the engine's
    /// vocabulary, yields an empty result.
    #[instrument(skip(self), fields(reported = reported.len()))]
    pub fn analyze(&self, reported: &[Symptom]) -> Vec<DiagnosisResult> {
        metrics::counter!("diagnosis_requests_total").increment(1);

        let features = FeatureVector::from_symptoms(&self.vocabulary, reported);
        if features.count_present() == 0 {
            metrics::counter!("diagnosis_empty_total", "reason" => "no_symptoms").increment(1);
            return Vec::new();
        }

        let probabilities = self.model.predict_proba(&features);
        let results: Vec<DiagnosisResult> =
            rank_candidates(&probabilities, self.confidence_threshold, self.max_results)
                .into_iter()
                .filter_map(|(class, probability)| {
                    let condition = self.classes.get(class)?;
                    Some(DiagnosisResult {
                        condition: condition.clone(),
                        name: display_name(condition),
                        confidence: probability * 100.0,
                        symptom_matches: self.knowledge_base.match_count(condition, reported),
                    })
                })
                .collect();

        if results.is_empty() {
            metrics::counter!("diagnosis_empty_total", "reason" => "below_threshold").increment(1);
        }
        tracing::debug!(
            results = results.len(),
            top = results.first().map(|r| r.condition.as_str()),
            "Analyzed symptoms"
        );
        results
    }
}

/// Selects `(class, probability)` pairs strictly above `threshold`.
///
/// Sorted by probability descending; equal probabilities keep class order.
/// At most `max_results` pairs are returned.
#[must_use]
pub fn rank_candidates(
    probabilities: &[f64],
    threshold: f64,
    max_results: usize,
) -> Vec<(usize, f64)> {
    let mut candidates: Vec<(usize, f64)> = probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| *p > threshold)
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(max_results);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_engine() -> DiagnosticEngine {
        let settings = EngineSettings::default()
            .with_noise_probability(0.0)
            .with_seed(7);
        DiagnosticEngine::new(&settings).unwrap()
    }

    fn symptoms(tokens: &[&str]) -> Vec<Symptom> {
        Vocabulary::builtin().normalize(tokens)
    }

    #[test]
    fn test_rank_candidates_threshold_and_order() {
        let ranked = rank_candidates(&[0.05, 0.4, 0.1, 0.45], 0.10, 3);
        assert_eq!(ranked, vec![(3, 0.45), (1, 0.4)]);
    }

    #[test]
    fn test_rank_candidates_ties_keep_class_order() {
        let ranked = rank_candidates(&[0.2, 0.3, 0.2, 0.2, 0.1], 0.10, 3);
        assert_eq!(ranked, vec![(1, 0.3), (0, 0.2), (2, 0.2)]);
    }

    #[test]
    fn test_rank_candidates_truncates() {
        let ranked = rank_candidates(&[0.25; 4], 0.10, 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_empty_input_yields_no_results() {
        let engine = exact_engine();
        assert!(engine.analyze(&[]).is_empty());
    }

    #[test]
    fn test_foreign_symptoms_yield_no_results() {
        let engine = exact_engine();
        assert!(engine.analyze(&[Symptom::new("not_a_symptom")]).is_empty());
    }

    #[test]
    fn test_exact_prototype_is_recognized() {
        let engine = exact_engine();
        let reported = symptoms(&["fever", "muscle_aches", "fatigue", "headache", "cough"]);
        let results = engine.analyze(&reported);

        let flu = results.iter().find(|r| r.condition == "flu").unwrap();
        assert_eq!(flu.name, "Flu");
        assert_eq!(flu.symptom_matches, 5);
        assert!((flu.confidence - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_results_are_bounded_and_sorted() {
        let engine = DiagnosticEngine::new(&EngineSettings::default().with_seed(42)).unwrap();
        let reported = symptoms(&["chest_pain", "dizziness", "fatigue", "headache"]);
        let results = engine.analyze(&reported);

        assert!(results.len() <= 3);
        for result in &results {
            assert!(result.confidence > 10.0 && result.confidence <= 100.0);
        }
        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_same_seed_same_ranking() {
        let settings = EngineSettings::default().with_seed(11);
        let a = DiagnosticEngine::new(&settings).unwrap();
        let b = DiagnosticEngine::new(&settings).unwrap();
        let reported = symptoms(&["fever", "cough", "fatigue"]);
        assert_eq!(a.analyze(&reported), b.analyze(&reported));
    }

    #[test]
    fn test_check_vocabulary() {
        let engine = exact_engine();
        assert!(engine.check_vocabulary(&Vocabulary::builtin()).is_ok());

        let other = Vocabulary::from_tokens(2, ["fever"]).unwrap();
        assert!(matches!(
            engine.check_vocabulary(&other),
            Err(Error::VocabularyMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_mismatched_knowledge_base() {
        let other = Vocabulary::from_tokens(1, ["fever", "cough"]).unwrap();
        let result = DiagnosticEngine::with_knowledge_base(
            other,
            KnowledgeBase::builtin(),
            &EngineSettings::default().with_seed(1),
        );
        assert!(matches!(result, Err(Error::VocabularyMismatch { .. })));
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = EngineSettings::default().with_samples_per_condition(0);
        assert!(matches!(
            DiagnosticEngine::new(&settings),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_model_kind_follows_settings() {
        let settings = EngineSettings::default()
            .with_model(ModelKind::NaiveBayes)
            .with_seed(3);
        let engine = DiagnosticEngine::new(&settings).unwrap();
        assert_eq!(engine.model_kind(), ModelKind::NaiveBayes);
        assert_eq!(engine.classes().len(), 17);
        assert_eq!(engine.classes()[0], "acid_reflux");
    }
}
