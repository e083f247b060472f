//! Data models for the advisor.
//!
//! This module contains the reference data (vocabulary, knowledge base, tips)
//! and the per-query and persisted diagnosis types.

mod condition;
mod diagnosis;
mod symptom;
mod tip;

pub use condition::{KnowledgeBase, KnowledgeBaseBuilder};
pub use diagnosis::{DiagnosisRecord, DiagnosisResult, HistoryStats};
pub use symptom::{Symptom, VOCABULARY_VERSION, Vocabulary, display_name, normalize_token};
pub use tip::{
    CONDITION_TIPS, GENERAL_TIPS, MENTAL_HEALTH_TIPS, NUTRITION_TIPS, Tip, TipCategory,
};
