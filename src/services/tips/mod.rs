//! Tip personalization.
//!
//! Recent diagnoses are mapped to condition-specific tips through an ordered
//! [`TipMatcher`] chain, then padded with general tips when too few specific
//! ones were found. Any storage failure degrades to the built-in general tips.

mod matchers;

pub use matchers::{ExactMatch, KeywordFallback, NormalizedMatch, SubstringMatch, TipMatcher};

use super::history::HistoryService;
use crate::Result;
use crate::config::TipSettings;
use crate::models::{GENERAL_TIPS, TipCategory, normalize_token};
use crate::storage::HealthStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

/// Title used when no history is available.
pub const GENERAL_TITLE: &str = "General Health Tips";

/// Selects tips for the user from their recent diagnoses.
pub struct TipPersonalizer {
    store: Arc<dyn HealthStore>,
    history: HistoryService,
    settings: TipSettings,
    matchers: Vec<Box<dyn TipMatcher>>,
}

impl TipPersonalizer {
    /// Creates a personalizer with the default matcher chain.
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, settings: TipSettings) -> Self {
        Self {
            history: HistoryService::new(Arc::clone(&store)),
            store,
            settings,
            matchers: matchers::default_chain(),
        }
    }

    /// Replaces the matcher chain.
    #[must_use]
    pub fn with_matchers(mut self, matchers: Vec<Box<dyn TipMatcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &TipSettings {
        &self.settings
    }

    /// General tips from the store, or the built-in list if unavailable.
    #[must_use]
    pub fn general_tips(&self) -> Vec<String> {
        self.category_tips(TipCategory::General)
    }

    /// Tips of one category from the store.
    ///
    /// General tips fall back to the built-in list; other categories fall back
    /// to an empty list.
    #[must_use]
    pub fn category_tips(&self, category: TipCategory) -> Vec<String> {
        match self.store.tips_by_category(category) {
            Ok(tips) if !tips.is_empty() => tips,
            Ok(_) if category != TipCategory::General => Vec::new(),
            Ok(_) => builtin_general(),
            Err(e) => {
                tracing::warn!(error = %e, category = %category, "Tip lookup failed");
                metrics::counter!("tips_fallback_total", "reason" => "category").increment(1);
                if category == TipCategory::General {
                    builtin_general()
                } else {
                    Vec::new()
                }
            },
        }
    }

    /// Tips for the given recent condition names, most recent first.
    ///
    /// Returns general tips unchanged for an empty list. Otherwise the result
    /// holds at most `max_tips` entries with no duplicates, condition-specific
    /// tips before general padding. A storage failure yields the first
    /// `max_tips` built-in general tips.
    #[must_use]
    pub fn personalized_tips(&self, recent_conditions: &[String]) -> Vec<String> {
        if recent_conditions.is_empty() {
            return self.general_tips();
        }
        self.try_personalized(recent_conditions).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Personalized tip lookup failed");
            metrics::counter!("tips_fallback_total", "reason" => "personalized").increment(1);
            self.capped(builtin_general())
        })
    }

    /// Tips personalized from the most recent diagnoses, with a title.
    ///
    /// Never fails and never returns more than `max_tips` tips. Without
    /// history (including when history cannot be read) the general tips are
    /// returned under [`GENERAL_TITLE`].
    #[instrument(skip(self))]
    pub fn smart_tips(&self) -> (Vec<String>, String) {
        let recent = self
            .history
            .recent_conditions(self.settings.recent_conditions);

        if recent.is_empty() {
            return (self.capped(self.general_tips()), GENERAL_TITLE.to_string());
        }

        let title = format!(
            "Personalized Tips for {}",
            distinct_conditions(&recent, 2).join(" & ")
        );
        (self.personalized_tips(&recent), title)
    }

    fn capped(&self, mut tips: Vec<String>) -> Vec<String> {
        tips.truncate(self.settings.max_tips);
        tips
    }

    fn try_personalized(&self, recent_conditions: &[String]) -> Result<Vec<String>> {
        let conditions = distinct_conditions(recent_conditions, self.settings.recent_conditions);

        let mut specific = Vec::new();
        for condition in &conditions {
            if let Some(tips) = self.match_condition(condition)? {
                specific.extend(tips.into_iter().take(self.settings.tips_per_condition));
            }
        }

        let padding = self.settings.padding_for(specific.len());
        tracing::debug!(
            conditions = conditions.len(),
            specific = specific.len(),
            padding,
            "Selected condition tips"
        );

        let mut tips = specific;
        if padding > 0 {
            let general = match self.store.tips_by_category(TipCategory::General)? {
                general if general.is_empty() => builtin_general(),
                general => general,
            };
            tips.extend(general.into_iter().take(padding));
        }

        let mut tips = dedupe(tips);
        tips.truncate(self.settings.max_tips);
        Ok(tips)
    }

    fn match_condition(&self, condition: &str) -> Result<Option<Vec<String>>> {
        for matcher in &self.matchers {
            if let Some(tips) = matcher.find(self.store.as_ref(), condition)? {
                tracing::debug!(condition, matcher = matcher.name(), "Matched tips");
                return Ok(Some(tips));
            }
        }
        Ok(None)
    }
}

fn builtin_general() -> Vec<String> {
    GENERAL_TIPS.iter().map(ToString::to_string).collect()
}

/// First `limit` distinct names, compared in normalized form, in input order.
fn distinct_conditions(names: &[String], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(normalize_token(name)))
        .take(limit)
        .cloned()
        .collect()
}

/// Removes repeats, keeping the first occurrence.
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiagnosisRecord, HistoryStats, Symptom, Tip};
    use crate::storage::{ConditionPattern, SqliteHealthStore};
    use crate::{Error, Result};

    struct FailingStore;

    impl HealthStore for FailingStore {
        fn save_diagnosis(&self, _: &[Symptom], _: &str, _: f64) -> Result<i64> {
            Err(Error::operation("save_diagnosis", "unavailable"))
        }
        fn recent_records(&self, _: usize) -> Result<Vec<DiagnosisRecord>> {
            Err(Error::operation("recent_records", "unavailable"))
        }
        fn tips_by_category(&self, _: TipCategory) -> Result<Vec<String>> {
            Err(Error::operation("tips_by_category", "unavailable"))
        }
        fn tips_by_condition_pattern(&self, _: &ConditionPattern) -> Result<Vec<String>> {
            Err(Error::operation("tips_by_condition_pattern", "unavailable"))
        }
        fn all_tips(&self) -> Result<Vec<(TipCategory, String)>> {
            Err(Error::operation("all_tips", "unavailable"))
        }
        fn stats(&self) -> Result<HistoryStats> {
            Err(Error::operation("stats", "unavailable"))
        }
        fn insert_tip(&self, _: &Tip) -> Result<i64> {
            Err(Error::operation("insert_tip", "unavailable"))
        }
    }

    fn sqlite() -> Arc<SqliteHealthStore> {
        Arc::new(SqliteHealthStore::in_memory().unwrap())
    }

    fn personalizer(store: Arc<dyn HealthStore>) -> TipPersonalizer {
        TipPersonalizer::new(store, TipSettings::default())
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_empty_history_returns_general_tips() {
        let tips = personalizer(sqlite()).personalized_tips(&[]);
        assert_eq!(tips, builtin_general());
    }

    #[test]
    fn test_specific_tips_come_first() {
        let store = sqlite();
        let uti = store
            .tips_by_condition_pattern(&ConditionPattern::Exact("urinary_tract_infection".into()))
            .unwrap();
        let arthritis = store
            .tips_by_condition_pattern(&ConditionPattern::Exact("arthritis".into()))
            .unwrap();

        let tips = personalizer(store)
            .personalized_tips(&names(&["Urinary Tract Infection", "Arthritis"]));

        assert!(tips.len() <= 8);
        assert_eq!(tips[..2], uti[..2]);
        assert_eq!(tips[2..4], arthritis[..2]);
        assert_eq!(tips.iter().collect::<HashSet<_>>().len(), tips.len());
    }

    #[test]
    fn test_single_condition_is_padded() {
        let tips = personalizer(sqlite()).personalized_tips(&names(&["Flu"]));
        // 2 specific + max(3, 8 - 2) general
        assert_eq!(tips.len(), 8);
        assert_eq!(tips[2..], builtin_general()[..6]);
    }

    #[test]
    fn test_unmatched_condition_gets_general_tips() {
        let tips = personalizer(sqlite()).personalized_tips(&names(&["Sprained Ankle"]));
        assert_eq!(tips, builtin_general()[..8]);
    }

    #[test]
    fn test_only_recent_distinct_conditions_count() {
        let store = sqlite();
        let tips = personalizer(store.clone()).personalized_tips(&names(&[
            "Flu", "flu", "Migraine", "Anemia", "Insomnia",
        ]));
        let insomnia = store
            .tips_by_condition_pattern(&ConditionPattern::Exact("insomnia".into()))
            .unwrap();
        assert_eq!(tips.len(), 6);
        assert!(insomnia.iter().all(|t| !tips.contains(t)));
    }

    /// Serves history and general tips but fails every condition lookup.
    struct ConditionLookupFails(SqliteHealthStore);

    impl HealthStore for ConditionLookupFails {
        fn save_diagnosis(
            &self,
            symptoms: &[Symptom],
            diagnosis: &str,
            confidence: f64,
        ) -> Result<i64> {
            self.0.save_diagnosis(symptoms, diagnosis, confidence)
        }
        fn recent_records(&self, limit: usize) -> Result<Vec<DiagnosisRecord>> {
            self.0.recent_records(limit)
        }
        fn tips_by_category(&self, category: TipCategory) -> Result<Vec<String>> {
            self.0.tips_by_category(category)
        }
        fn tips_by_condition_pattern(&self, _: &ConditionPattern) -> Result<Vec<String>> {
            Err(Error::operation("tips_by_condition_pattern", "unavailable"))
        }
        fn all_tips(&self) -> Result<Vec<(TipCategory, String)>> {
            self.0.all_tips()
        }
        fn stats(&self) -> Result<HistoryStats> {
            self.0.stats()
        }
        fn insert_tip(&self, tip: &Tip) -> Result<i64> {
            self.0.insert_tip(tip)
        }
    }

    #[test]
    fn test_storage_failure_falls_back() {
        let personalizer = personalizer(Arc::new(FailingStore));
        assert_eq!(personalizer.personalized_tips(&names(&["Flu"])), builtin_general()[..8]);
        assert_eq!(personalizer.general_tips(), builtin_general());
        assert!(personalizer.category_tips(TipCategory::Nutrition).is_empty());

        let (tips, title) = personalizer.smart_tips();
        assert_eq!(tips, builtin_general()[..8]);
        assert_eq!(title, GENERAL_TITLE);
    }

    #[test]
    fn test_condition_lookup_failure_respects_max_tips() {
        let store = ConditionLookupFails(SqliteHealthStore::in_memory().unwrap());
        store.save_diagnosis(&[], "Flu", 80.0).unwrap();
        let personalizer = personalizer(Arc::new(store));

        let tips = personalizer.personalized_tips(&names(&["Flu"]));
        assert_eq!(tips.len(), 8);
        assert_eq!(tips, builtin_general()[..8]);

        let (tips, title) = personalizer.smart_tips();
        assert_eq!(title, "Personalized Tips for Flu");
        assert_eq!(tips.len(), 8);
    }

    #[test]
    fn test_fallback_follows_configured_cap() {
        let settings = TipSettings {
            max_tips: 4,
            ..TipSettings::default()
        };
        let personalizer = TipPersonalizer::new(Arc::new(FailingStore), settings);
        assert_eq!(personalizer.personalized_tips(&names(&["Flu"])).len(), 4);
        assert_eq!(personalizer.smart_tips().0.len(), 4);
    }

    #[test]
    fn test_smart_tips_without_history() {
        let (tips, title) = personalizer(sqlite()).smart_tips();
        assert_eq!(tips, builtin_general()[..8]);
        assert_eq!(title, GENERAL_TITLE);
    }

    #[test]
    fn test_smart_tips_with_history() {
        let store = sqlite();
        for name in ["Arthritis", "Flu", "Flu"] {
            store.save_diagnosis(&[], name, 50.0).unwrap();
        }
        let (tips, title) = personalizer(store).smart_tips();
        assert_eq!(title, "Personalized Tips for Flu & Arthritis");
        assert!(!tips.is_empty() && tips.len() <= 8);
    }

    #[test]
    fn test_custom_chain() {
        let personalizer =
            personalizer(sqlite()).with_matchers(vec![Box::new(ExactMatch) as Box<dyn TipMatcher>]);
        // Display names only resolve through normalization, which is not in the chain.
        let tips = personalizer.personalized_tips(&names(&["Heart Disease"]));
        assert_eq!(tips, builtin_general()[..8]);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        assert_eq!(dedupe(names(&["a", "b", "a", "c", "b"])), names(&["a", "b", "c"]));
    }
}
