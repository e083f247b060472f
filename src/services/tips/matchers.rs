//! Condition-name matchers for tip lookup.
//!
//! Diagnosis labels come back from history as display names
//! (`Urinary Tract Infection`) while tips are keyed by condition patterns
//! (`urinary_tract_infection`). Each matcher is one lookup strategy; the
//! personalizer tries them in order and stops at the first that yields tips.

use crate::Result;
use crate::models::normalize_token;
use crate::storage::{ConditionPattern, HealthStore};

/// One strategy for finding tips that belong to a condition name.
pub trait TipMatcher: Send + Sync {
    /// Short strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Tips for `condition`, or `None` if this strategy found nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    fn find(&self, store: &dyn HealthStore, condition: &str) -> Result<Option<Vec<String>>>;
}

fn non_empty(tips: Vec<String>) -> Option<Vec<String>> {
    (!tips.is_empty()).then_some(tips)
}

/// Case-insensitive match on the name as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl TipMatcher for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find(&self, store: &dyn HealthStore, condition: &str) -> Result<Option<Vec<String>>> {
        let condition = condition.trim();
        if condition.is_empty() {
            return Ok(None);
        }
        store
            .tips_by_condition_pattern(&ConditionPattern::Exact(condition.to_string()))
            .map(non_empty)
    }
}

/// Match on the snake_case form (`Heart Disease` -> `heart_disease`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedMatch;

impl TipMatcher for NormalizedMatch {
    fn name(&self) -> &'static str {
        "normalized"
    }

    fn find(&self, store: &dyn HealthStore, condition: &str) -> Result<Option<Vec<String>>> {
        let normalized = normalize_token(condition);
        if normalized.is_empty() {
            return Ok(None);
        }
        store
            .tips_by_condition_pattern(&ConditionPattern::Exact(normalized))
            .map(non_empty)
    }
}

/// Tips whose condition key contains the snake_case form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl TipMatcher for SubstringMatch {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn find(&self, store: &dyn HealthStore, condition: &str) -> Result<Option<Vec<String>>> {
        let normalized = normalize_token(condition);
        if normalized.is_empty() {
            return Ok(None);
        }
        store
            .tips_by_condition_pattern(&ConditionPattern::Contains(normalized))
            .map(non_empty)
    }
}

/// Fixed keywords mapped to tip condition keys.
///
/// A keyword applies when it equals one of the name's words or the name's
/// initials (`Urinary Tract Infection` -> `uti`).
#[derive(Debug, Clone)]
pub struct KeywordFallback {
    keywords: Vec<(String, String)>,
}

impl KeywordFallback {
    /// Built-in keyword table.
    pub const DEFAULT_KEYWORDS: &'static [(&'static str, &'static str)] = &[
        ("uti", "urinary_tract_infection"),
        ("infection", "infection"),
        ("diabetes", "diabetes"),
    ];

    /// Creates a fallback from `(keyword, condition key)` pairs, tried in order.
    #[must_use]
    pub fn new<I, K, C>(keywords: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        }
    }

    fn applies(keyword: &str, normalized: &str) -> bool {
        let initials: String = normalized
            .split('_')
            .filter_map(|word| word.chars().next())
            .collect();
        initials == keyword || normalized.split('_').any(|word| word == keyword)
    }
}

impl Default for KeywordFallback {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEYWORDS.iter().copied())
    }
}

impl TipMatcher for KeywordFallback {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn find(&self, store: &dyn HealthStore, condition: &str) -> Result<Option<Vec<String>>> {
        let normalized = normalize_token(condition);
        for (keyword, key) in &self.keywords {
            if !Self::applies(keyword, &normalized) {
                continue;
            }
            let tips = store.tips_by_condition_pattern(&ConditionPattern::Exact(key.clone()))?;
            if !tips.is_empty() {
                return Ok(Some(tips));
            }
        }
        Ok(None)
    }
}

/// The default matcher chain, in the order it is tried.
#[must_use]
pub fn default_chain() -> Vec<Box<dyn TipMatcher>> {
    vec![
        Box::new(ExactMatch),
        Box::new(NormalizedMatch),
        Box::new(SubstringMatch),
        Box::new(KeywordFallback::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteHealthStore;
    use test_case::test_case;

    #[test_case("flu", true ; "exact key")]
    #[test_case("FLU", true ; "exact key any case")]
    #[test_case("Urinary Tract Infection", false ; "display name needs normalizing")]
    #[test_case("", false ; "empty")]
    fn test_exact(condition: &str, found: bool) {
        let store = SqliteHealthStore::in_memory().unwrap();
        assert_eq!(ExactMatch.find(&store, condition).unwrap().is_some(), found);
    }

    #[test_case("Urinary Tract Infection", true ; "display name")]
    #[test_case("heart-disease", true ; "hyphenated")]
    #[test_case("Tract Infection", false ; "partial name")]
    fn test_normalized(condition: &str, found: bool) {
        let store = SqliteHealthStore::in_memory().unwrap();
        assert_eq!(NormalizedMatch.find(&store, condition).unwrap().is_some(), found);
    }

    #[test_case("Tract Infection", true ; "suffix of key")]
    #[test_case("Reflux", true ; "one word of key")]
    #[test_case("Gout", false ; "unknown")]
    fn test_substring(condition: &str, found: bool) {
        let store = SqliteHealthStore::in_memory().unwrap();
        assert_eq!(SubstringMatch.find(&store, condition).unwrap().is_some(), found);
    }

    #[test_case("UTI", Some("urinary_tract_infection") ; "abbreviation")]
    #[test_case("Kidney Infection", Some("infection") ; "infection word")]
    #[test_case("Type 2 Diabetes", Some("diabetes") ; "diabetes word")]
    #[test_case("Sprained Ankle", None ; "no keyword")]
    fn test_keyword(condition: &str, key: Option<&str>) {
        let store = SqliteHealthStore::in_memory().unwrap();
        let found = KeywordFallback::default().find(&store, condition).unwrap();
        let expected = key.map(|k| {
            store
                .tips_by_condition_pattern(&ConditionPattern::Exact(k.to_string()))
                .unwrap()
        });
        assert_eq!(found, expected);
    }

    #[test]
    fn test_initials() {
        assert!(KeywordFallback::applies("uti", "urinary_tract_infection"));
        assert!(!KeywordFallback::applies("uti", "cutis"));
    }

    #[test]
    fn test_default_chain_order() {
        let names: Vec<_> = default_chain().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["exact", "normalized", "substring", "keyword"]);
    }
}
