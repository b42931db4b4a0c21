//! Shared types flowing between pipeline stages.

use serde::Serialize;

/// Which generation stage produced a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    MainBody,
    DiagnosticAssessment,
    Checklist,
    Elaboration,
    LiteratureSummary,
}

impl FragmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::MainBody => "main_body",
            FragmentKind::DiagnosticAssessment => "diagnostic_assessment",
            FragmentKind::Checklist => "checklist",
            FragmentKind::Elaboration => "elaboration",
            FragmentKind::LiteratureSummary => "literature_summary",
        }
    }
}

/// One piece of generated text, tagged with the stage that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedFragment {
    pub kind: FragmentKind,
    pub text: String,
}

/// Canonical primary diagnosis extracted from the assessment fragment.
///
/// Computed once per run; every later conditional stage reads it.
/// The three parts are present only when the structured pass matched.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisClassification {
    pub severity: Option<String>,
    pub syndrome: Option<String>,
    pub pathology: Option<String>,
    /// Canonical label, e.g. "Alzheimer's Disease".
    pub label: String,
    /// Whether the label names Alzheimer's as the primary pathology.
    pub alzheimers_primary: bool,
}
