//! Property-based tests for normalization, ranking and tip selection.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Symptom normalization ignores order, repetition and case
//! - Analysis results are bounded, above threshold and sorted
//! - Personalized tips are unique and capped

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use symptom_advisor::engine::{DiagnosticEngine, rank_candidates};
use symptom_advisor::models::normalize_token;
use symptom_advisor::{EngineSettings, SqliteHealthStore, TipPersonalizer, TipSettings, Vocabulary};

static ENGINE: LazyLock<DiagnosticEngine> = LazyLock::new(|| {
    DiagnosticEngine::new(&EngineSettings::default().with_seed(42)).expect("engine trains")
});

static PERSONALIZER: LazyLock<TipPersonalizer> = LazyLock::new(|| {
    let store = Arc::new(SqliteHealthStore::in_memory().expect("in-memory store"));
    TipPersonalizer::new(store, TipSettings::default())
});

fn builtin_tokens() -> Vec<String> {
    Vocabulary::builtin()
        .symptoms()
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

fn reported_symptoms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(builtin_tokens()), 0..10)
}

proptest! {
    /// Property: normalizing a token twice changes nothing.
    #[test]
    fn prop_normalize_token_idempotent(s in "[ a-zA-Z_-]{0,40}") {
        let once = normalize_token(&s);
        prop_assert_eq!(normalize_token(&once), once);
    }

    /// Property: normalizing already-normalized symptoms changes nothing.
    #[test]
    fn prop_vocabulary_normalize_idempotent(
        tokens in prop::collection::vec(
            prop_oneof![
                prop::sample::select(builtin_tokens()),
                "[ a-zA-Z_-]{0,20}",
            ],
            0..12,
        )
    ) {
        let vocabulary = Vocabulary::builtin();
        let once = vocabulary.normalize(&tokens);
        let twice = vocabulary.normalize(once.iter().map(|s| s.as_str()));
        prop_assert_eq!(twice, once);
    }

    /// Property: vocabulary normalization ignores order, repeats and case.
    #[test]
    fn prop_normalize_order_independent(tokens in reported_symptoms()) {
        let vocabulary = Vocabulary::builtin();
        let forward = vocabulary.normalize(&tokens);

        let mut shuffled: Vec<String> = tokens.iter().rev().map(|t| t.to_uppercase()).collect();
        shuffled.extend(tokens.iter().cloned());
        prop_assert_eq!(vocabulary.normalize(&shuffled), forward.clone());

        let unique: HashSet<_> = forward.iter().collect();
        prop_assert_eq!(unique.len(), forward.len());
    }

    /// Property: unknown tokens never produce symptoms.
    #[test]
    fn prop_unknown_tokens_dropped(s in "zz[a-z]{3,12}") {
        prop_assert!(Vocabulary::builtin().normalize([s]).is_empty());
    }

    /// Property: results are bounded, above threshold and non-increasing.
    #[test]
    fn prop_analyze_bounds(tokens in reported_symptoms()) {
        let reported = ENGINE.vocabulary().normalize(&tokens);
        let results = ENGINE.analyze(&reported);

        prop_assert!(results.len() <= 3);
        if reported.is_empty() {
            prop_assert!(results.is_empty());
        }
        for result in &results {
            prop_assert!(result.confidence > 10.0 && result.confidence <= 100.0);
            prop_assert!(result.symptom_matches <= reported.len());
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    /// Property: ranking keeps only candidates strictly above the threshold.
    #[test]
    fn prop_rank_candidates_threshold(
        probs in prop::collection::vec(0.0f64..=1.0, 1..20),
        threshold in 0.0f64..1.0,
        max in 1usize..6,
    ) {
        let ranked = rank_candidates(&probs, threshold, max);
        prop_assert!(ranked.len() <= max);
        let above = probs.iter().filter(|p| **p > threshold).count();
        prop_assert_eq!(ranked.len(), above.min(max));
        for (index, p) in &ranked {
            prop_assert!((probs[*index] - p).abs() < f64::EPSILON);
        }
    }

    /// Property: personalized tips are unique and capped.
    #[test]
    fn prop_personalized_tips_unique_and_capped(
        conditions in prop::collection::vec("[A-Za-z ]{1,24}", 0..6)
    ) {
        let tips = PERSONALIZER.personalized_tips(&conditions);
        let max = PERSONALIZER.settings().max_tips;
        if !conditions.is_empty() {
            prop_assert!(tips.len() <= max);
        }
        let unique: HashSet<_> = tips.iter().collect();
        prop_assert_eq!(unique.len(), tips.len());
    }
}
