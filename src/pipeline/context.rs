//! Formats raw clinician input into labeled context blocks.
//!
//! Four input sections feed every generation call: background history,
//! current-visit material (transcription included), the clinician's own
//! insights, and any post-review revisions. Each is wrapped in a labeled
//! block so prompts can reference them by section; absent input becomes a
//! fixed sentinel rather than an error.

use crate::deidentify::basic_deidentify;

use super::templates::NOT_PROVIDED;

/// Raw, unformatted input sections for one note-generation run.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    /// Records from prior visits.
    pub background: Option<String>,
    /// Clinician's additional thoughts, emphasis, potential diagnoses.
    pub additional: Option<String>,
    /// Current-visit transcription and reason for visit.
    pub transcription: Option<String>,
    /// Post-review additions and clarifications.
    pub revised: Option<String>,
}

/// Labeled context blocks consumed by generation calls.
///
/// Immutable once built; lives for a single pipeline run.
#[derive(Debug, Clone)]
pub struct ContextBundle {
    historical: String,
    current_visit: String,
    insight: String,
    revision: String,
}

impl ContextBundle {
    pub fn from_raw(raw: &RawInputs) -> Self {
        Self {
            historical: labeled_block(
                "BACKGROUND INFORMATION (Prior to this visit)",
                raw.background.as_deref(),
            ),
            current_visit: labeled_block(
                "CURRENT VISIT CONTEXT (Includes transcription if available, and reason for visit)",
                raw.transcription.as_deref(),
            ),
            insight: labeled_block(
                "CLINICIAN'S ADDITIONAL INFORMATION/EMPHASIS",
                raw.additional.as_deref(),
            ),
            revision: labeled_block(
                "CLINICIAN'S REVISED INFORMATION/FURTHER COMMENTS",
                raw.revised.as_deref(),
            ),
        }
    }

    pub fn historical(&self) -> &str {
        &self.historical
    }

    pub fn current_visit(&self) -> &str {
        &self.current_visit
    }

    /// Clinician insight and revision blocks joined, for calls that take
    /// them as a single section.
    pub fn insights(&self) -> String {
        format!("{}\n\n{}", self.insight, self.revision)
    }

    /// Background and current-visit blocks joined, for the assessment call's
    /// merged history shape.
    pub fn merged_history(&self) -> String {
        format!("{}\n\n{}", self.historical, self.current_visit)
    }
}

/// Each block is de-identified before it can reach any generation call.
fn labeled_block(label: &str, value: Option<&str>) -> String {
    let body = match value {
        Some(text) if !text.trim().is_empty() => basic_deidentify(text.trim()),
        _ => NOT_PROVIDED.to_string(),
    };
    format!("{label}:\n{body}")
}
