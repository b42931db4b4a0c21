//! Scans a finished note for sections left without data.
//!
//! The generation service writes a fixed sentinel into any section it had no
//! input for; this pass collects the headers above those sentinels into a
//! deduplicated summary so the clinician sees every gap in one place.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::templates::MISSING_SUMMARY_HEADING;

/// A header line (heading markup and colon tolerated) directly above the
/// missing-data sentinel, blank lines permitted in between.
static MISSING_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:[#*]+[ \t]*)?(.*?)(?:[ \t]*:[ \t]*)?(?:\r?\n)+[ \t]*NO INFORMATION FOUND")
        .unwrap()
});

static TRAILING_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:*]+$").unwrap());
static LEADING_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#*]+\s*").unwrap());

/// Header captures longer than this are parsing noise, not section names.
const MAX_HEADER_LEN: usize = 100;

/// Structural sections that legitimately carry the sentinel as a template
/// default; never reported as missing.
const EXCLUDED_HEADERS: &[&str] = &[
    "medical explanation",
    "plan rationale",
    "plan",
    "patient instructions",
    "recent literature summary",
    "plain language summary",
    "summary of key patient findings",
    "differential diagnoses",
    "reasoning for most likely diagnosis",
    "missing information and recommended next steps",
    "prognostic considerations",
    "clinical plan",
    "important caveats",
    "alzheimer's disease candidate checklist template",
    "alzheimer's disease candidate checklist instructions",
    "alzheimer's disease candidate checklist",
    "supporting criteria from diagnostic algorithm",
    "patient-specific elaboration of diagnostic criteria",
];

/// Collect deduplicated, lexicographically sorted headers of sections whose
/// body is the missing-data sentinel.
pub fn scan_missing_info(document: &str) -> Vec<String> {
    let mut headers = BTreeSet::new();

    for capture in MISSING_HEADER.captures_iter(document) {
        let raw = capture.get(1).map(|m| m.as_str()).unwrap_or("");
        let cleaned = clean_header(raw);
        if cleaned.is_empty() {
            continue;
        }

        let lower = cleaned.to_lowercase();
        if EXCLUDED_HEADERS.iter().any(|ex| *ex == lower) {
            continue;
        }

        if cleaned.contains('\n') || cleaned.len() >= MAX_HEADER_LEN {
            tracing::debug!(header = %cleaned, "skipped noisy header capture");
            continue;
        }

        headers.insert(cleaned);
    }

    headers.into_iter().collect()
}

/// Render the missing-information summary section for the end of the note.
pub fn missing_info_summary(document: &str) -> String {
    let sections = scan_missing_info(document);

    let mut summary = format!("{MISSING_SUMMARY_HEADING}\n\n");
    if sections.is_empty() {
        summary.push_str(
            "All sections of the note appear to contain information from the provided context.\n",
        );
    } else {
        summary.push_str(
            "The following sections were marked 'NO INFORMATION FOUND' because no data was available in the provided context:\n",
        );
        for section in &sections {
            summary.push_str(&format!("* {section}\n"));
        }
        tracing::debug!(count = sections.len(), "missing-information sections found");
    }

    summary.push_str(
        "\nIf the Alzheimer's checklist is included, review it directly for '***' placeholders or items marked 'UNKNOWN'.",
    );
    summary
}

fn clean_header(raw: &str) -> String {
    let trimmed = raw.trim();
    let no_trailing = TRAILING_DECORATION.replace(trimmed, "");
    LEADING_DECORATION.replace(no_trailing.trim(), "").trim().to_string()
}
