//! Plain-text rendering.
//!
//! Formats diagnosis reports, history listings, storage statistics and tip
//! lists for terminal output.

mod report;

pub use report::{
    CONSULTATION_DISCLAIMER, NO_DIAGNOSIS_MESSAGE, format_diagnosis_report, format_history,
    format_stats, format_tips,
};
