//! Diagnosis history service.

use crate::models::{DiagnosisRecord, DiagnosisResult, HistoryStats, Symptom};
use crate::storage::HealthStore;
use std::sync::Arc;
use tracing::instrument;

/// Records diagnoses and reads history back with safe fallbacks.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn HealthStore>,
}

impl HistoryService {
    /// Creates a history service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Persists the top diagnosis for `symptoms`.
    ///
    /// Returns `false` if the store rejected the write.
    #[instrument(skip(self, symptoms), fields(condition = %top.condition))]
    pub fn record(&self, symptoms: &[Symptom], top: &DiagnosisResult) -> bool {
        match self.store.save_diagnosis(symptoms, &top.name, top.confidence) {
            Ok(id) => {
                tracing::debug!(id, "Recorded diagnosis");
                true
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record diagnosis");
                false
            },
        }
    }

    /// Up to `limit` records, most recent first; empty on failure.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<DiagnosisRecord> {
        self.store.recent_records(limit).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read diagnosis history");
            Vec::new()
        })
    }

    /// Diagnosis names of the `limit` most recent records.
    #[must_use]
    pub fn recent_conditions(&self, limit: usize) -> Vec<String> {
        self.recent(limit).into_iter().map(|r| r.diagnosis).collect()
    }

    /// History statistics; zeroed on failure.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        self.store.stats().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to compute history stats");
            HistoryStats::default()
        })
    }
}
