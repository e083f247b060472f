//! Business logic services.
//!
//! Services sit between the presentation layer and the [`HealthStore`]
//! collaborator. They never propagate storage failures: each one logs the
//! error and falls back to a safe default.
//!
//! [`HealthStore`]: crate::storage::HealthStore

mod advisor;
mod history;
mod tips;

pub use advisor::{AdvisorService, DiagnosisOutcome};
pub use history::HistoryService;
pub use tips::{
    ExactMatch, KeywordFallback, NormalizedMatch, SubstringMatch, TipMatcher, TipPersonalizer,
};
