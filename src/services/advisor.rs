//! End-to-end advisor: normalize, analyze, record, report.

use super::{HistoryService, TipPersonalizer};
use crate::Result;
use crate::config::{EngineSettings, TipSettings};
use crate::engine::DiagnosticEngine;
use crate::models::{DiagnosisResult, Symptom};
use crate::rendering::format_diagnosis_report;
use crate::storage::HealthStore;
use std::sync::Arc;
use tracing::instrument;

/// Everything produced by one diagnosis request.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisOutcome {
    /// Recognized symptoms, in vocabulary order.
    pub symptoms: Vec<Symptom>,
    /// Ranked candidates, most confident first.
    pub results: Vec<DiagnosisResult>,
    /// Rendered report, always carrying the disclaimer.
    pub report: String,
    /// Whether the top diagnosis was persisted.
    pub saved: bool,
}

impl DiagnosisOutcome {
    /// The top-ranked result, if any.
    #[must_use]
    pub fn top(&self) -> Option<&DiagnosisResult> {
        self.results.first()
    }
}

/// Wires the diagnostic engine to history and tips.
pub struct AdvisorService {
    engine: DiagnosticEngine,
    history: HistoryService,
    tips: TipPersonalizer,
}

impl AdvisorService {
    /// Trains the built-in engine and attaches `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if engine or tip settings are invalid.
    pub fn new(
        engine_settings: &EngineSettings,
        tip_settings: TipSettings,
        store: Arc<dyn HealthStore>,
    ) -> Result<Self> {
        let engine = DiagnosticEngine::new(engine_settings)?;
        Self::with_engine(engine, tip_settings, store)
    }

    /// Uses an already trained engine.
    ///
    /// # Errors
    ///
    /// Returns an error if tip settings are invalid.
    pub fn with_engine(
        engine: DiagnosticEngine,
        tip_settings: TipSettings,
        store: Arc<dyn HealthStore>,
    ) -> Result<Self> {
        tip_settings.validate()?;
        Ok(Self {
            engine,
            history: HistoryService::new(Arc::clone(&store)),
            tips: TipPersonalizer::new(store, tip_settings),
        })
    }

    /// The trained engine.
    #[must_use]
    pub const fn engine(&self) -> &DiagnosticEngine {
        &self.engine
    }

    /// History access.
    #[must_use]
    pub const fn history(&self) -> &HistoryService {
        &self.history
    }

    /// Tip personalization.
    #[must_use]
    pub const fn tips(&self) -> &TipPersonalizer {
        &self.tips
    }

    /// Normalizes raw symptom tokens, ranks conditions and records the top one.
    ///
    /// Unrecognized tokens are dropped. Nothing is recorded when there is no
    /// result, and a failed write only clears [`DiagnosisOutcome::saved`].
    #[instrument(skip_all, fields(raw = raw.len()))]
    pub fn diagnose<S: AsRef<str>>(&self, raw: &[S]) -> DiagnosisOutcome {
        let symptoms = self
            .engine
            .vocabulary()
            .normalize(raw.iter().map(AsRef::as_ref));
        let results = self.engine.analyze(&symptoms);
        let report = format_diagnosis_report(&results, &symptoms);
        let saved = results
            .first()
            .is_some_and(|top| self.history.record(&symptoms, top));

        tracing::info!(
            recognized = symptoms.len(),
            results = results.len(),
            saved,
            "Diagnosis complete"
        );

        DiagnosisOutcome {
            symptoms,
            results,
            report,
            saved,
        }
    }
}
