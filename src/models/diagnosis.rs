//! Diagnosis results, persisted records and history statistics.

use super::symptom::Symptom;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ranked candidate produced by the diagnostic engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Condition key (`urinary_tract_infection`).
    pub condition: String,
    /// Display name (`Urinary Tract Infection`).
    pub name: String,
    /// Class probability scaled to 0-100.
    pub confidence: f64,
    /// Reported symptoms that belong to the condition's characteristic set.
    pub symptom_matches: usize,
}

/// One persisted diagnosis event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    /// Row identifier assigned by the store.
    pub id: i64,
    /// When the diagnosis was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Reported symptoms, in the order they were analyzed.
    pub symptoms: Vec<Symptom>,
    /// Display name of the top diagnosis.
    pub diagnosis: String,
    /// Confidence of the top diagnosis (0-100).
    pub confidence: f64,
}

impl DiagnosisRecord {
    /// Symptoms joined as display names (`Fever, Chest Pain`).
    #[must_use]
    pub fn symptoms_display(&self) -> String {
        self.symptoms
            .iter()
            .map(Symptom::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Aggregate statistics over the diagnosis history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of stored diagnosis records.
    pub total_records: u64,
    /// Most frequent diagnosis and how many times it was recorded.
    pub most_frequent: Option<(String, u64)>,
    /// Size of the backing database in bytes.
    pub storage_size_bytes: u64,
}

impl HistoryStats {
    /// Label for the most frequent diagnosis (`Flu (3x)`), or `None`.
    #[must_use]
    pub fn most_frequent_label(&self) -> String {
        self.most_frequent
            .as_ref()
            .map_or_else(|| "None".to_string(), |(name, count)| format!("{name} ({count}x)"))
    }
}
