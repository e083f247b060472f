//! Symptom tokens and the ordered vocabulary.
//!
//! The vocabulary order defines the feature-vector index used by the
//! classifier. Any change to the ordered token list changes the fingerprint,
//! and models trained against the old fingerprint are rejected.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Version of the built-in vocabulary. Bump whenever [`BUILTIN_SYMPTOMS`] changes.
pub const VOCABULARY_VERSION: u32 = 1;

/// Built-in symptom tokens, in feature-vector order.
const BUILTIN_SYMPTOMS: &[&str] = &[
    "fever",
    "headache",
    "cough",
    "sore_throat",
    "runny_nose",
    "fatigue",
    "nausea",
    "vomiting",
    "diarrhea",
    "stomach_pain",
    "muscle_aches",
    "chest_pain",
    "shortness_of_breath",
    "dizziness",
    "rash",
    "joint_pain",
    "back_pain",
    "difficulty_swallowing",
    "loss_of_appetite",
    "weight_loss",
    "night_sweats",
    "chills",
    "confusion",
    "memory_problems",
    "blurred_vision",
    "ear_pain",
    "difficulty_urinating",
    "frequent_urination",
    "constipation",
    "difficulty_sleeping",
    "insomnia",
    "anxiety",
    "stress",
    "weakness",
    "tremors",
    "sweating",
    "dry_mouth",
    "abdominal_pain",
    "bloating",
    "heartburn",
    "acid_reflux",
    "swollen_lymph_nodes",
    "bruising",
    "pale_skin",
    "rapid_heartbeat",
    "irregular_heartbeat",
    "high_blood_pressure",
    "low_blood_pressure",
    "tingling",
    "numbness",
    "leg_cramps",
    "restlessness",
];

/// A canonical symptom token such as `chest_pain`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symptom(String);

impl Symptom {
    /// Wraps a token. Callers are expected to pass canonical (normalized) tokens.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the title-cased display form (`chest_pain` becomes `Chest Pain`).
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symptom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a raw token: trims, lower-cases, and joins words with `_`.
///
/// # Examples
///
/// ```
/// use symptom_advisor::models::normalize_token;
///
/// assert_eq!(normalize_token("  Chest Pain "), "chest_pain");
/// assert_eq!(normalize_token("sore-throat"), "sore_throat");
/// ```
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Renders a snake_case token in title case.
///
/// # Examples
///
/// ```
/// use symptom_advisor::models::display_name;
///
/// assert_eq!(display_name("urinary_tract_infection"), "Urinary Tract Infection");
/// ```
#[must_use]
pub fn display_name(token: &str) -> String {
    token
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The fixed, ordered set of recognized symptoms.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    version: u32,
    symptoms: Vec<Symptom>,
    index: HashMap<String, usize>,
    fingerprint: String,
}

impl Vocabulary {
    /// Returns the built-in 52-symptom vocabulary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::assemble(
            VOCABULARY_VERSION,
            BUILTIN_SYMPTOMS.iter().map(|s| Symptom::new(*s)).collect(),
        )
    }

    /// Builds a custom vocabulary from an ordered token list.
    ///
    /// Tokens are canonicalized with [`normalize_token`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the list is empty, a token is empty
    /// after canonicalization, or a token appears twice.
    pub fn from_tokens<I, S>(version: u32, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut symptoms = Vec::new();
        for raw in tokens {
            let token = normalize_token(raw.as_ref());
            if token.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "empty symptom token at position {}",
                    symptoms.len()
                )));
            }
            if !seen.insert(token.clone()) {
                return Err(Error::InvalidInput(format!("duplicate symptom token: {token}")));
            }
            symptoms.push(Symptom::new(token));
        }
        if symptoms.is_empty() {
            return Err(Error::InvalidInput("vocabulary must not be empty".to_string()));
        }
        Ok(Self::assemble(version, symptoms))
    }

    fn assemble(version: u32, symptoms: Vec<Symptom>) -> Self {
        let index = symptoms
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str().to_string(), i))
            .collect();
        let fingerprint = fingerprint_of(version, &symptoms);
        Self {
            version,
            symptoms,
            index,
            fingerprint,
        }
    }

    /// Returns the symptoms in feature-vector order.
    #[must_use]
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    /// Number of symptoms (the feature-vector length).
    #[must_use]
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    /// Always false for a constructed vocabulary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Returns the declared version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the SHA-256 fingerprint of the version and ordered token list.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Returns the feature index of a canonical token.
    #[must_use]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Returns true if the canonical token is recognized.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Normalizes raw user input into recognized symptoms.
    ///
    /// Unrecognized tokens are dropped silently. The output is in vocabulary
    /// order with no duplicates, so it does not depend on input order or
    /// repetition.
    pub fn normalize<I, S>(&self, raw: I) -> Vec<Symptom>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let indices: BTreeSet<usize> = raw
            .into_iter()
            .filter_map(|token| self.index_of(&normalize_token(token.as_ref())))
            .collect();
        indices
            .into_iter()
            .map(|i| self.symptoms[i].clone())
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn fingerprint_of(version: u32, symptoms: &[Symptom]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("v{version}").as_bytes());
    for symptom in symptoms {
        hasher.update(b"\n");
        hasher.update(symptom.as_str().as_bytes());
    }
    hex::encode(hasher.finalize())
}
