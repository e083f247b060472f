//! Text formatters for the advisor's user-facing output.

use crate::models::{DiagnosisRecord, DiagnosisResult, HistoryStats, Symptom};
use chrono::Local;
use std::fmt::Write;
use std::path::Path;

/// Disclaimer appended to every diagnosis report.
pub const CONSULTATION_DISCLAIMER: &str = "DISCLAIMER: This is for informational purposes only.\nAlways consult a healthcare professional for proper diagnosis!";

/// Shown in place of the condition list when nothing cleared the threshold.
pub const NO_DIAGNOSIS_MESSAGE: &str =
    "No specific diagnosis found. Please consult a healthcare professional.";

/// Closing line under every tip list.
const TIPS_FOOTER: &str =
    "Remember: These are general tips. Always consult healthcare professionals for personalized advice!";

/// Renders ranked diagnoses for the analyzed symptoms.
///
/// The disclaimer is always present, including when `results` is empty.
#[must_use]
pub fn format_diagnosis_report(results: &[DiagnosisResult], symptoms: &[Symptom]) -> String {
    let analyzed = symptoms
        .iter()
        .map(Symptom::display_name)
        .collect::<Vec<_>>()
        .join(", ");

    let mut report = format!("DIAGNOSIS REPORT\n\nSymptoms analyzed: {analyzed}\n\n");

    if results.is_empty() {
        let _ = write!(report, "{NO_DIAGNOSIS_MESSAGE}\n\n");
    } else {
        report.push_str("Possible conditions:\n\n");
        for (i, result) in results.iter().enumerate() {
            let _ = writeln!(report, "{}. {}", i + 1, result.name);
            let _ = writeln!(report, "   Confidence: {:.1}%", result.confidence);
            let _ = write!(report, "   Symptom matches: {}\n\n", result.symptom_matches);
        }
    }

    report.push_str(CONSULTATION_DISCLAIMER);
    report
}

/// Renders a history listing, most recent first.
#[must_use]
pub fn format_history(records: &[DiagnosisRecord]) -> String {
    if records.is_empty() {
        return "No previous diagnoses found.".to_string();
    }

    let mut text = String::from("DIAGNOSIS HISTORY:\n\n");
    for (i, record) in records.iter().enumerate() {
        let when = record.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let _ = writeln!(text, "{}. {when}", i + 1);
        let _ = writeln!(text, "   Symptoms: {}", record.symptoms_display());
        let _ = write!(text, "   Diagnosis: {}", record.diagnosis);
        if record.confidence > 0.0 {
            let _ = write!(text, " ({:.1}%)", record.confidence);
        }
        text.push_str("\n\n");
    }
    text
}

/// Renders storage statistics and the database location.
#[must_use]
pub fn format_stats(stats: &HistoryStats, location: &Path) -> String {
    let mut text = String::from("DATABASE STATISTICS\n\nDiagnosis Records:\n");
    let _ = writeln!(text, "Total Diagnoses: {}", stats.total_records);
    let _ = write!(text, "Most Common: {}\n\n", stats.most_frequent_label());
    let _ = writeln!(text, "Database Size: {} bytes", stats.storage_size_bytes);
    let _ = write!(text, "Location: {}", location.display());
    text
}

/// Renders a titled, numbered tip list.
#[must_use]
pub fn format_tips<S: AsRef<str>>(title: &str, tips: &[S]) -> String {
    let mut text = format!("{}\n\n", title.to_uppercase());
    for (i, tip) in tips.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, tip.as_ref());
    }
    let _ = write!(text, "\n{TIPS_FOOTER}");
    text
}
