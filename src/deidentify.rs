//! Basic regex de-identification of free-text input.
//!
//! Replaces obvious PHI (names, dates, ages, phone numbers, addresses,
//! e-mails, SSNs, record numbers) with fixed redaction tokens before the
//! text reaches the generation service. This is a coarse first-pass filter,
//! not a certified scrubber.

use std::sync::LazyLock;

use regex::Regex;

/// Ordered redaction table. Order matters: title+name runs before the bare
/// capitalized-run rule would otherwise leave the title behind.
static REDACTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"\b(?:Mr|Mrs|Ms|Dr)\.\s*[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\b").unwrap(),
            "[NAME_REDACTED]",
        ),
        // Any 2-3 word capitalized run is treated as a name.
        (
            Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2}\b").unwrap(),
            "[NAME_REDACTED]",
        ),
        (
            Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b").unwrap(),
            "[DATE_REDACTED]",
        ),
        (
            Regex::new(
                r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+\d{1,2}(?:st|nd|rd|th)?(?:,\s+\d{2,4})?\b",
            )
            .unwrap(),
            "[DATE_REDACTED]",
        ),
        (
            Regex::new(r"(?i)\b(?:age\s+\d{1,3}|\d{1,3}[-\s]years?[-\s]old)\b").unwrap(),
            "[AGE_REDACTED]",
        ),
        (
            Regex::new(r"\b(?:\+?\d{1,3}[-\s]?)?\(?\d{3}\)?[-\s.]?\d{3}[-\s.]?\d{4}\b").unwrap(),
            "[PHONE_REDACTED]",
        ),
        (
            Regex::new(
                r"(?i)\b\d{3,5}\s+[A-Z0-9][A-Za-z0-9\s]+(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Drive|Dr|Boulevard|Blvd)\b",
            )
            .unwrap(),
            "[ADDRESS_REDACTED]",
        ),
        (
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            "[EMAIL_REDACTED]",
        ),
        (
            Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
            "[SSN_REDACTED]",
        ),
        // Generic identifiers like MRNs: one or two letters then 5+ digits.
        (
            Regex::new(r"\b[A-Z]{1,2}\d{5,}[A-Z]?\b").unwrap(),
            "[ID_REDACTED]",
        ),
    ]
});

/// Redact obvious PHI from free text. Empty input is returned unchanged.
pub fn basic_deidentify(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = text.to_string();
    for (pattern, replacement) in REDACTIONS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    tracing::debug!("basic de-identification applied");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_capitalized_names() {
        let result = basic_deidentify("Seen today: John Smith, accompanied by spouse.");
        assert!(!result.contains("John Smith"));
        assert!(result.contains("[NAME_REDACTED]"));
    }

    #[test]
    fn redacts_titled_names() {
        let result = basic_deidentify("Referred by Dr. Alvarez for memory complaints.");
        assert!(!result.contains("Alvarez"));
        assert!(result.contains("[NAME_REDACTED]"));
    }

    #[test]
    fn redacts_numeric_and_month_dates() {
        let result = basic_deidentify("MRI on 03/14/2024, repeat scheduled for June 2nd, 2025.");
        assert!(!result.contains("03/14/2024"));
        assert!(!result.contains("June 2nd"));
        assert_eq!(result.matches("[DATE_REDACTED]").count(), 2);
    }

    #[test]
    fn redacts_ages() {
        let result = basic_deidentify("A 72-year-old patient, age 72 at onset.");
        assert!(!result.contains("72-year-old"));
        assert!(!result.contains("age 72"));
        assert!(result.contains("[AGE_REDACTED]"));
    }

    #[test]
    fn redacts_phone_numbers() {
        let result = basic_deidentify("Callback number (210) 555-0142.");
        assert!(!result.contains("555-0142"));
        assert!(result.contains("[PHONE_REDACTED]"));
    }

    #[test]
    fn redacts_emails_and_ssns() {
        let result = basic_deidentify("contact: jane@example.org, SSN 123-45-6789");
        assert!(!result.contains("jane@example.org"));
        assert!(!result.contains("123-45-6789"));
        assert!(result.contains("[EMAIL_REDACTED]"));
        assert!(result.contains("[SSN_REDACTED]"));
    }

    #[test]
    fn redacts_record_numbers() {
        let result = basic_deidentify("MRN AB123456 on file.");
        assert!(!result.contains("AB123456"));
        assert!(result.contains("[ID_REDACTED]"));
    }

    #[test]
    fn leaves_lowercase_clinical_text_alone() {
        let input = "gradual memory decline with word-finding difficulty";
        assert_eq!(basic_deidentify(input), input);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(basic_deidentify(""), "");
    }
}
