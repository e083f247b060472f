//! # Symptom Advisor
//!
//! A local, single-user symptom-to-diagnosis advisor.
//!
//! A user reports symptoms from a fixed vocabulary, a classifier trained on
//! synthetic noisy examples ranks candidate conditions, the top diagnosis is
//! recorded in a local `SQLite` history, and health tips are personalized from
//! that history.
//!
//! ## Features
//!
//! - Ordered, fingerprinted symptom vocabulary with lenient normalization
//! - Built-in knowledge base of 17 conditions
//! - Decision-tree and Bernoulli naive Bayes classifiers behind one trait
//! - Seedable noise injection for reproducible training
//! - Diagnosis history and tips persisted in `SQLite`
//! - Tip personalization through an ordered chain of condition matchers
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use symptom_advisor::{AdvisorService, EngineSettings, SqliteHealthStore, TipSettings};
//!
//! let store = Arc::new(SqliteHealthStore::in_memory()?);
//! let advisor = AdvisorService::new(&EngineSettings::default(), TipSettings::default(), store)?;
//! let outcome = advisor.diagnose(&["fever", "cough", "chest_pain"]);
//! println!("{}", outcome.report);
//! ```
//!
//! This is not a medically validated system. Every report carries a disclaimer
//! recommending professional consultation.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod engine;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{AdvisorConfig, EngineSettings, ModelKind, TipSettings};
pub use engine::DiagnosticEngine;
pub use models::{
    DiagnosisRecord, DiagnosisResult, HistoryStats, KnowledgeBase, Symptom, Tip, TipCategory,
    Vocabulary,
};
pub use services::{AdvisorService, DiagnosisOutcome, HistoryService, TipPersonalizer};
pub use storage::{HealthStore, SqliteHealthStore};

/// Error type for advisor operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed vocabulary or knowledge base, out-of-range settings |
/// | `OperationFailed` | `SQLite`, filesystem, JSON or config parsing failures |
/// | `VocabularyMismatch` | A model or knowledge base is used with a different vocabulary |
///
/// Unrecognized symptoms are never an error; they are dropped during
/// normalization.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A custom vocabulary has empty or duplicate tokens
    /// - A knowledge base condition names an unknown symptom or has none
    /// - Engine or tip settings are out of range
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - Filesystem I/O errors occur
    /// - Stored symptom lists cannot be decoded
    /// - The configuration file cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A vocabulary fingerprint does not match the one a model was built for.
    #[error("vocabulary mismatch: expected {expected}, found {found}")]
    VocabularyMismatch {
        /// Fingerprint the model or knowledge base was built against.
        expected: String,
        /// Fingerprint of the vocabulary that was supplied.
        found: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for advisor operations.
pub type Result<T> = std::result::Result<T, Error>;
