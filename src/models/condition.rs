//! Condition knowledge base.

use super::symptom::{Symptom, Vocabulary, normalize_token};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Built-in conditions and their characteristic symptoms.
const BUILTIN_CONDITIONS: &[(&str, &[&str])] = &[
    ("common_cold", &["runny_nose", "sore_throat", "cough", "fatigue"]),
    ("flu", &["fever", "muscle_aches", "fatigue", "headache", "cough"]),
    ("pneumonia", &["fever", "cough", "chest_pain", "shortness_of_breath"]),
    (
        "gastroenteritis",
        &["nausea", "vomiting", "diarrhea", "stomach_pain", "abdominal_pain"],
    ),
    ("migraine", &["headache", "nausea", "blurred_vision", "dizziness"]),
    ("allergic_reaction", &["rash", "runny_nose", "shortness_of_breath"]),
    (
        "urinary_tract_infection",
        &["frequent_urination", "difficulty_urinating", "fever"],
    ),
    ("arthritis", &["joint_pain", "muscle_aches", "fatigue"]),
    (
        "anxiety_disorder",
        &[
            "chest_pain",
            "shortness_of_breath",
            "dizziness",
            "fatigue",
            "anxiety",
            "restlessness",
        ],
    ),
    (
        "depression",
        &[
            "fatigue",
            "loss_of_appetite",
            "memory_problems",
            "difficulty_sleeping",
            "weakness",
        ],
    ),
    (
        "diabetes",
        &["frequent_urination", "fatigue", "blurred_vision", "weight_loss"],
    ),
    (
        "hypertension",
        &[
            "headache",
            "dizziness",
            "chest_pain",
            "shortness_of_breath",
            "high_blood_pressure",
        ],
    ),
    (
        "hypotension",
        &["dizziness", "weakness", "fatigue", "low_blood_pressure"],
    ),
    ("anemia", &["fatigue", "weakness", "pale_skin", "shortness_of_breath"]),
    (
        "heart_disease",
        &[
            "chest_pain",
            "shortness_of_breath",
            "rapid_heartbeat",
            "irregular_heartbeat",
        ],
    ),
    ("acid_reflux", &["heartburn", "acid_reflux", "chest_pain", "dry_mouth"]),
    (
        "insomnia",
        &["difficulty_sleeping", "insomnia", "fatigue", "memory_problems"],
    ),
];

/// Mapping from condition key to its characteristic symptom set.
///
/// Keys are snake_case and iterate in lexicographic order, which is also the
/// class order used by the classifiers. The base remembers the fingerprint of
/// the vocabulary it was validated against.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    conditions: BTreeMap<String, BTreeSet<Symptom>>,
    vocabulary_fingerprint: String,
}

impl KnowledgeBase {
    /// Returns the built-in 17-condition knowledge base, bound to
    /// [`Vocabulary::builtin`].
    #[must_use]
    pub fn builtin() -> Self {
        let conditions: BTreeMap<String, BTreeSet<Symptom>> = BUILTIN_CONDITIONS
            .iter()
            .map(|(name, symptoms)| {
                (
                    (*name).to_string(),
                    symptoms.iter().map(|s| Symptom::new(*s)).collect(),
                )
            })
            .collect();
        Self {
            conditions,
            vocabulary_fingerprint: Vocabulary::builtin().fingerprint().to_string(),
        }
    }

    /// Starts building a custom knowledge base against `vocabulary`.
    #[must_use]
    pub fn builder(vocabulary: &Vocabulary) -> KnowledgeBaseBuilder<'_> {
        KnowledgeBaseBuilder {
            vocabulary,
            conditions: Vec::new(),
        }
    }

    /// Returns every condition and its symptom set.
    #[must_use]
    pub const fn conditions(&self) -> &BTreeMap<String, BTreeSet<Symptom>> {
        &self.conditions
    }

    /// Returns the characteristic symptoms of one condition.
    #[must_use]
    pub fn symptoms_of(&self, condition: &str) -> Option<&BTreeSet<Symptom>> {
        self.conditions.get(condition)
    }

    /// Condition keys in class order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Number of conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Always false for a constructed knowledge base.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Fingerprint of the vocabulary the base was validated against.
    #[must_use]
    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary_fingerprint
    }

    /// Counts reported symptoms that belong to `condition`'s characteristic set.
    ///
    /// Purely explanatory; ranking never uses it.
    #[must_use]
    pub fn match_count(&self, condition: &str, reported: &[Symptom]) -> usize {
        self.symptoms_of(condition).map_or(0, |characteristic| {
            reported
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|s| characteristic.contains(*s))
                .count()
        })
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder for custom knowledge bases.
#[derive(Debug)]
pub struct KnowledgeBaseBuilder<'a> {
    vocabulary: &'a Vocabulary,
    conditions: Vec<(String, Vec<String>)>,
}

impl KnowledgeBaseBuilder<'_> {
    /// Adds a condition with its characteristic symptoms.
    #[must_use]
    pub fn condition<S: AsRef<str>>(mut self, name: &str, symptoms: &[S]) -> Self {
        self.conditions.push((
            name.to_string(),
            symptoms.iter().map(|s| s.as_ref().to_string()).collect(),
        ));
        self
    }

    /// Validates and builds the knowledge base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no conditions were added, a name is
    /// empty or repeated, a condition has no symptoms, or a symptom is not in
    /// the vocabulary.
    pub fn build(self) -> Result<KnowledgeBase> {
        if self.conditions.is_empty() {
            return Err(Error::InvalidInput(
                "knowledge base must contain at least one condition".to_string(),
            ));
        }

        let mut conditions = BTreeMap::new();
        for (raw_name, raw_symptoms) in self.conditions {
            let name = normalize_token(&raw_name);
            if name.is_empty() {
                return Err(Error::InvalidInput("condition name is empty".to_string()));
            }

            let mut symptoms = BTreeSet::new();
            for raw in &raw_symptoms {
                let token = normalize_token(raw);
                if !self.vocabulary.contains(&token) {
                    return Err(Error::InvalidInput(format!(
                        "condition '{name}' references unknown symptom '{raw}'"
                    )));
                }
                symptoms.insert(Symptom::new(token));
            }
            if symptoms.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "condition '{name}' has no symptoms"
                )));
            }

            if conditions.insert(name.clone(), symptoms).is_some() {
                return Err(Error::InvalidInput(format!("duplicate condition: {name}")));
            }
        }

        Ok(KnowledgeBase {
            conditions,
            vocabulary_fingerprint: self.vocabulary.fingerprint().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_consistent_with_vocabulary() {
        let vocab = Vocabulary::builtin();
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.len(), 17);
        assert_eq!(kb.vocabulary_fingerprint(), vocab.fingerprint());
        for (name, symptoms) in kb.conditions() {
            assert!(!symptoms.is_empty(), "{name} has no symptoms");
            for symptom in symptoms {
                assert!(vocab.contains(symptom.as_str()), "{name}: {symptom}");
            }
        }
    }

    #[test]
    fn test_builtin_round_trips_through_builder() {
        let vocab = Vocabulary::builtin();
        let mut builder = KnowledgeBase::builder(&vocab);
        for (name, symptoms) in BUILTIN_CONDITIONS {
            builder = builder.condition(name, *symptoms);
        }
        let rebuilt = builder.build().unwrap();
        assert_eq!(rebuilt.conditions(), KnowledgeBase::builtin().conditions());
    }

    #[test]
    fn test_keys_are_sorted() {
        let kb = KnowledgeBase::builtin();
        let keys: Vec<&str> = kb.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(keys.first(), Some(&"acid_reflux"));
    }

    #[test]
    fn test_match_count() {
        let kb = KnowledgeBase::builtin();
        let reported = vec![
            Symptom::new("fever"),
            Symptom::new("headache"),
            Symptom::new("fatigue"),
            Symptom::new("rash"),
        ];
        assert_eq!(kb.match_count("flu", &reported), 3);
        assert_eq!(kb.match_count("common_cold", &reported), 1);
        assert_eq!(kb.match_count("unknown", &reported), 0);
        assert_eq!(kb.match_count("flu", &[]), 0);
    }

    #[test]
    fn test_builder_rejects_invalid_input() {
        let vocab = Vocabulary::builtin();
        assert!(KnowledgeBase::builder(&vocab).build().is_err());
        assert!(
            KnowledgeBase::builder(&vocab)
                .condition("x", &["not_a_symptom"])
                .build()
                .is_err()
        );
        assert!(
            KnowledgeBase::builder(&vocab)
                .condition("x", &[] as &[&str])
                .build()
                .is_err()
        );
        assert!(
            KnowledgeBase::builder(&vocab)
                .condition("flu", &["fever"])
                .condition("Flu", &["cough"])
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_canonicalizes_names() {
        let vocab = Vocabulary::builtin();
        let kb = KnowledgeBase::builder(&vocab)
            .condition("Common Cold", &["Runny Nose", "cough"])
            .build()
            .unwrap();
        let symptoms = kb.symptoms_of("common_cold").unwrap();
        assert!(symptoms.contains(&Symptom::new("runny_nose")));
    }
}
