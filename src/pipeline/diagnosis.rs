//! Extracts the canonical primary diagnosis from the assessment fragment.
//!
//! Two-tier extraction: a structured pass over the fixed
//! "1- Severity, 2- Syndrome, 3- Pathology" line, then a generative
//! fallback that asks the model for just the diagnosis name. First usable
//! result wins. Failure at both tiers is non-fatal for the pipeline; the
//! diagnosis-conditional stages are simply skipped.

use std::sync::LazyLock;

use regex::Regex;

use super::prompt;
use super::types::DiagnosisClassification;
use crate::llm::LlmClient;

pub const AD_LABEL: &str = "Alzheimer's Disease";
pub const MCI_DUE_TO_AD_LABEL: &str = "Mild Cognitive Impairment due to Alzheimer's Disease";

/// The structured three-part diagnosis line. Bold markers and the trailing
/// period are optional; the label is case-insensitive.
static MLD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\*\*\s*)?most\s+likely\s+diagnosis\s*:?\s*(?:\*\*)?\s*:?\s*1-\s*(?P<severity>.+?)\s*,\s*2-\s*(?P<syndrome>.+?)\s*,\s*3-\s*(?P<pathology>[^,.]+?)\s*\.?\s*$",
    )
    .unwrap()
});

/// Leading "N-" ordinal the fallback response sometimes carries over.
static LEADING_ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+-\s*").unwrap());

/// Word-boundary match so "AD" does not fire inside unrelated words.
static AD_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)alzheimer|\bad\b").unwrap());

/// Negation phrases override any Alzheimer's keyword in the label.
const NEGATION_PHRASES: &[&str] = &["not alzheimer", "rule out alzheimer", "unlikely alzheimer"];

/// Responses longer than this cannot be a single diagnosis name.
const MAX_EXTRACTION_LEN: usize = 150;

/// Extract and canonicalize the primary diagnosis, structured pass first.
pub fn classify<G: LlmClient>(
    assessment: &str,
    llm: &G,
    model: &str,
) -> Option<DiagnosisClassification> {
    if let Some(classification) = classify_structured(assessment) {
        return Some(classification);
    }

    tracing::debug!("structured diagnosis pass yielded nothing; trying generative extraction");
    classify_with_llm(assessment, llm, model)
}

/// Structured pass: scan line-by-line for the three-part diagnosis format.
pub fn classify_structured(assessment: &str) -> Option<DiagnosisClassification> {
    for line in assessment.lines() {
        let Some(caps) = MLD_LINE.captures(line.trim()) else {
            continue;
        };

        let severity = caps["severity"].trim().to_string();
        let syndrome = caps["syndrome"].trim().to_string();
        let pathology = caps["pathology"].trim().to_string();

        if let Some(label) = canonical_label(&severity, &syndrome, &pathology) {
            return Some(DiagnosisClassification {
                alzheimers_primary: is_alzheimers_primary(&label),
                severity: Some(severity),
                syndrome: Some(syndrome),
                pathology: Some(pathology),
                label,
            });
        }

        // Matched the line structure but every part was an "unknown"
        // placeholder; keep scanning the remaining lines.
        tracing::debug!(line, "diagnosis line matched but unusable");
    }

    None
}

/// Canonicalize the three parts into a single label, or `None` when every
/// part is an unknown placeholder.
fn canonical_label(severity: &str, syndrome: &str, pathology: &str) -> Option<String> {
    let sev = severity.to_lowercase();
    let syn = syndrome.to_lowercase();
    let path = pathology.to_lowercase();

    let severity_known = !severity.is_empty() && !sev.contains("unknown severity");

    if !pathology.is_empty() && !path.contains("unknown") {
        if AD_MENTION.is_match(pathology) {
            if sev.contains("mci") || sev.contains("mild cognitive impairment") {
                return Some(MCI_DUE_TO_AD_LABEL.to_string());
            }
            return Some(AD_LABEL.to_string());
        }
        return Some(pathology.to_string());
    }

    if syn.contains("alzheimer's clinical syndrome") && path.contains("unknown") {
        return Some(AD_LABEL.to_string());
    }

    if !syndrome.is_empty() && !syn.contains("unknown syndrome") {
        return Some(if severity_known {
            format!("{severity} - {syndrome}")
        } else {
            syndrome.to_string()
        });
    }

    if severity_known {
        return Some(severity.to_string());
    }

    None
}

/// Generative fallback: ask the model for just the diagnosis name.
fn classify_with_llm<G: LlmClient>(
    assessment: &str,
    llm: &G,
    model: &str,
) -> Option<DiagnosisClassification> {
    let extraction_prompt = prompt::build_extraction_prompt(assessment);
    let raw = match llm.generate(model, &extraction_prompt, prompt::EXTRACTION_SYSTEM) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "generative diagnosis extraction failed");
            return None;
        }
    };

    let label = postprocess_extraction(&raw)?;
    Some(DiagnosisClassification {
        alzheimers_primary: is_alzheimers_primary(&label),
        severity: None,
        syndrome: None,
        pathology: None,
        label,
    })
}

/// Clean up the fallback response and apply the canonicalization rules.
/// Rejects the "NONE" sentinel and anything too long to be a diagnosis name.
fn postprocess_extraction(raw: &str) -> Option<String> {
    let mut text = raw.trim().to_string();
    if let Some(stripped) = text.strip_suffix('.') {
        text = stripped.trim_end().to_string();
    }

    if text.is_empty()
        || text.eq_ignore_ascii_case("none")
        || text.chars().count() > MAX_EXTRACTION_LEN
    {
        tracing::debug!(response = %text, "extraction response unusable");
        return None;
    }

    let text = LEADING_ORDINAL.replace(&text, "").trim().to_string();
    let lower = text.to_lowercase();

    if lower.contains("likely due to ad")
        || lower.contains("possible ad")
        || lower.contains("alzheimer's disease")
        || lower.contains("alzheimer's clinical syndrome")
    {
        if lower.contains("mci") || lower.contains("mild cognitive impairment") {
            return Some(MCI_DUE_TO_AD_LABEL.to_string());
        }
        return Some(AD_LABEL.to_string());
    }

    Some(text)
}

/// Whether a label names Alzheimer's as the primary pathology.
/// A negation phrase anywhere in the label always wins over keywords.
pub fn is_alzheimers_primary(label: &str) -> bool {
    let lower = label.to_lowercase();
    if NEGATION_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return false;
    }
    AD_MENTION.is_match(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    #[test]
    fn structured_pass_extracts_ad_pathology() {
        let assessment = "## Medical Explanation\n\n\
            **Most Likely Diagnosis:** 1- Mild Dementia, 2- Amnestic Presentation, 3- Alzheimer's Disease.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "Alzheimer's Disease");
        assert!(result.alzheimers_primary);
        assert_eq!(result.severity.as_deref(), Some("Mild Dementia"));
        assert_eq!(result.pathology.as_deref(), Some("Alzheimer's Disease"));
    }

    #[test]
    fn mci_severity_with_ad_pathology_canonicalizes() {
        let assessment =
            "Most Likely Diagnosis: 1- Mild Cognitive Impairment, 2- Amnestic Presentation, 3- Alzheimer's Disease";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, MCI_DUE_TO_AD_LABEL);
        assert!(result.alzheimers_primary);
    }

    #[test]
    fn non_ad_pathology_returned_verbatim() {
        let assessment =
            "**Most Likely Diagnosis:** 1- Mild Dementia, 2- Behavioral Variant FTD, 3- FTLD-tau.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "FTLD-tau");
        assert!(!result.alzheimers_primary);
    }

    #[test]
    fn ad_clinical_syndrome_with_unknown_pathology() {
        let assessment =
            "**Most Likely Diagnosis:** 1- Mild Dementia, 2- Alzheimer's Clinical Syndrome, 3- Unknown Pathology.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "Alzheimer's Disease");
    }

    #[test]
    fn known_syndrome_with_unknowns_combines_severity() {
        let assessment =
            "**Most Likely Diagnosis:** 1- Moderate Dementia, 2- Non-fluent PPA, 3- Unknown Pathology.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "Moderate Dementia - Non-fluent PPA");
        assert!(!result.alzheimers_primary);
    }

    #[test]
    fn only_severity_known_returns_severity() {
        let assessment =
            "**Most Likely Diagnosis:** 1- Mild Dementia, 2- Unknown Syndrome, 3- Unknown Pathology.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "Mild Dementia");
    }

    #[test]
    fn all_unknown_line_is_unusable_and_scanning_continues() {
        let assessment = "\
            **Most Likely Diagnosis:** 1- Unknown Severity, 2- Unknown Syndrome, 3- Unknown Pathology.\n\
            **Most Likely Diagnosis:** 1- Mild Dementia, 2- Amnestic Presentation, 3- Alzheimer's Disease.";
        let result = classify_structured(assessment).unwrap();
        assert_eq!(result.label, "Alzheimer's Disease");
    }

    #[test]
    fn no_structured_line_yields_none() {
        assert!(classify_structured("## Medical Explanation\nFindings only.").is_none());
    }

    #[test]
    fn fallback_strips_ordinal_and_period() {
        let llm = MockLlmClient::new("3- Frontotemporal Dementia.");
        let result = classify("No structured line here.", &llm, "model").unwrap();
        assert_eq!(result.label, "Frontotemporal Dementia");
        assert!(result.severity.is_none());
    }

    #[test]
    fn fallback_rejects_none_sentinel() {
        let llm = MockLlmClient::new("NONE");
        assert!(classify("No structured line here.", &llm, "model").is_none());
    }

    #[test]
    fn fallback_rejects_overlong_response() {
        let llm = MockLlmClient::new(&"x".repeat(200));
        assert!(classify("No structured line here.", &llm, "model").is_none());
    }

    #[test]
    fn fallback_canonicalizes_possible_ad() {
        let llm = MockLlmClient::new("Possible AD given amnestic profile");
        let result = classify("No structured line here.", &llm, "model").unwrap();
        assert_eq!(result.label, "Alzheimer's Disease");
        assert!(result.alzheimers_primary);
    }

    #[test]
    fn structured_pass_wins_without_calling_fallback() {
        // The mock would return garbage; the structured result must win.
        let llm = MockLlmClient::new("Vascular Dementia");
        let assessment =
            "**Most Likely Diagnosis:** 1- Mild Dementia, 2- Amnestic Presentation, 3- Alzheimer's Disease.";
        let result = classify(assessment, &llm, "model").unwrap();
        assert_eq!(result.label, "Alzheimer's Disease");
    }

    #[test]
    fn negation_overrides_keyword() {
        assert!(!is_alzheimers_primary("Rule out Alzheimer's Disease"));
        assert!(!is_alzheimers_primary("Unlikely Alzheimer's; favor vascular etiology"));
        assert!(!is_alzheimers_primary("Not Alzheimer's Disease"));
    }

    #[test]
    fn ad_abbreviation_matches_on_word_boundary_only() {
        assert!(is_alzheimers_primary("AD"));
        assert!(is_alzheimers_primary("Probable AD"));
        assert!(!is_alzheimers_primary("Advanced vascular disease"));
        assert!(!is_alzheimers_primary("Adjustment disorder"));
    }

    #[test]
    fn mci_due_to_ad_label_is_primary() {
        assert!(is_alzheimers_primary(MCI_DUE_TO_AD_LABEL));
    }
}
