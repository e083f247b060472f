//! Storage collaborator trait.

use crate::Result;
use crate::models::{DiagnosisRecord, HistoryStats, Symptom, Tip, TipCategory};

/// How a tip's condition association is matched.
///
/// Both forms compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionPattern {
    /// The whole condition value equals the pattern.
    Exact(String),
    /// The condition value contains the pattern as a literal substring.
    Contains(String),
}

impl ConditionPattern {
    /// The raw pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(s) | Self::Contains(s) => s,
        }
    }
}

/// Persistence for diagnosis history and health tips.
///
/// Implementations own their schema and reference data. Callers in the core
/// treat every error as a degraded result rather than a failure.
pub trait HealthStore: Send + Sync {
    /// Appends a diagnosis record.
    ///
    /// # Returns
    ///
    /// The identifier of the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_diagnosis(&self, symptoms: &[Symptom], diagnosis: &str, confidence: f64)
    -> Result<i64>;

    /// Returns up to `limit` records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or decoded.
    fn recent_records(&self, limit: usize) -> Result<Vec<DiagnosisRecord>>;

    /// Returns tip texts in `category`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the tips cannot be read.
    fn tips_by_category(&self, category: TipCategory) -> Result<Vec<String>>;

    /// Returns texts of tips whose condition association matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tips cannot be read.
    fn tips_by_condition_pattern(&self, pattern: &ConditionPattern) -> Result<Vec<String>>;

    /// Returns every tip as `(category, text)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tips cannot be read.
    fn all_tips(&self) -> Result<Vec<(TipCategory, String)>>;

    /// Aggregate history statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be computed.
    fn stats(&self) -> Result<HistoryStats>;

    /// Adds a tip to the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the tip cannot be written.
    fn insert_tip(&self, tip: &Tip) -> Result<i64>;
}
