//! Marker-based section editing over the note under construction.
//!
//! Sections are located by exact substring match on fixed marker literals —
//! the source text is free-form generative output, so no structural parsing
//! is attempted. Every operation leaves the buffer a complete, renderable
//! document.

use std::sync::LazyLock;

use regex::Regex;

/// "\n##" also prefixes "###", covering both heading levels.
static NEXT_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n##").unwrap());

/// Result of an extract-and-remove pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Span found and removed; carries the removed content, markers included.
    Removed(String),
    /// Start marker absent — buffer untouched.
    NotPresent,
    /// Start marker present without its end marker — buffer untouched.
    Malformed,
}

/// The single mutable document being assembled.
#[derive(Debug, Clone)]
pub struct DocumentBuffer {
    text: String,
}

impl DocumentBuffer {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into().trim().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Remove the first `[start_marker … end_marker]` span (inclusive) and
    /// return it. The remaining halves are re-joined with one blank line.
    ///
    /// Idempotent: a second call on the same buffer reports `NotPresent`.
    pub fn extract_and_remove(&mut self, start_marker: &str, end_marker: &str) -> ExtractOutcome {
        let Some(start) = self.text.find(start_marker) else {
            return ExtractOutcome::NotPresent;
        };

        let Some(end_offset) = self.text[start + start_marker.len()..].find(end_marker) else {
            tracing::warn!(
                start_marker,
                end_marker,
                "start marker found without end marker; section left untouched"
            );
            return ExtractOutcome::Malformed;
        };

        let end = start + start_marker.len() + end_offset + end_marker.len();
        let removed = self.text[start..end].to_string();

        let before = self.text[..start].trim_end();
        let after = self.text[end..].trim_start();
        self.text = join_sections(before, after);

        ExtractOutcome::Removed(removed)
    }

    /// Replace the first occurrence of `placeholder` with `replacement`, or
    /// append `replacement` when the placeholder is absent. Generated
    /// content is never silently dropped.
    pub fn substitute_placeholder(&mut self, placeholder: &str, replacement: &str) {
        match self.text.find(placeholder) {
            Some(start) => {
                self.text
                    .replace_range(start..start + placeholder.len(), replacement.trim());
            }
            None => {
                tracing::debug!(placeholder, "placeholder not found; appending instead");
                self.append_section(replacement);
            }
        }
    }

    /// Replace the region starting at `heading` with `replacement`.
    ///
    /// The region ends at the next level-2/3 heading after `heading`, else
    /// at the next blank-line pair, else at the document end. Absent
    /// heading: `replacement` is appended. The boundary heuristic is
    /// deliberately approximate; free-form generated text carries no
    /// structural guarantees.
    pub fn replace_heading_region(&mut self, heading: &str, replacement: &str) {
        let Some(start) = self.text.find(heading) else {
            self.append_section(replacement);
            return;
        };

        let after_heading = start + heading.len();
        let rest = &self.text[after_heading..];
        let end = NEXT_HEADING
            .find(rest)
            .map(|m| after_heading + m.start())
            .or_else(|| rest.find("\n\n").map(|i| after_heading + i))
            .unwrap_or(self.text.len());

        let before = self.text[..start].trim_end().to_string();
        let after = self.text[end..].trim_start().to_string();
        self.text = join_sections(&join_sections(&before, replacement.trim()), &after);
    }

    /// Append a section at the document end, blank-line separated.
    pub fn append_section(&mut self, section: &str) {
        let section = section.trim();
        if section.is_empty() {
            return;
        }
        self.text = join_sections(self.text.trim_end(), section);
    }
}

fn join_sections(before: &str, after: &str) -> String {
    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_string(),
        (_, true) => before.to_string(),
        _ => format!("{before}\n\n{after}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "--- BEGIN ---";
    const END: &str = "--- END ---";

    fn doc_with_span() -> DocumentBuffer {
        DocumentBuffer::new(format!(
            "Intro paragraph.\n\n{START}\nspan content\n{END}\n\nClosing paragraph."
        ))
    }

    #[test]
    fn extract_removes_inclusive_span() {
        let mut doc = doc_with_span();
        let outcome = doc.extract_and_remove(START, END);

        match outcome {
            ExtractOutcome::Removed(content) => {
                assert!(content.starts_with(START));
                assert!(content.ends_with(END));
                assert!(content.contains("span content"));
            }
            other => panic!("expected Removed, got {other:?}"),
        }
        assert_eq!(doc.as_str(), "Intro paragraph.\n\nClosing paragraph.");
    }

    #[test]
    fn extract_without_start_marker_is_noop() {
        let mut doc = DocumentBuffer::new("No markers here.");
        assert_eq!(doc.extract_and_remove(START, END), ExtractOutcome::NotPresent);
        assert_eq!(doc.as_str(), "No markers here.");
    }

    #[test]
    fn extract_is_idempotent() {
        let mut doc = doc_with_span();
        assert!(matches!(
            doc.extract_and_remove(START, END),
            ExtractOutcome::Removed(_)
        ));
        assert_eq!(doc.extract_and_remove(START, END), ExtractOutcome::NotPresent);
    }

    #[test]
    fn extract_missing_end_marker_leaves_buffer_untouched() {
        let original = format!("Intro.\n\n{START}\ndangling span");
        let mut doc = DocumentBuffer::new(original.clone());
        assert_eq!(doc.extract_and_remove(START, END), ExtractOutcome::Malformed);
        assert_eq!(doc.as_str(), original);
    }

    #[test]
    fn substitute_replaces_first_occurrence() {
        let mut doc = DocumentBuffer::new("Before [SLOT] after. Another [SLOT].");
        doc.substitute_placeholder("[SLOT]", "inserted");
        assert_eq!(doc.as_str(), "Before inserted after. Another [SLOT].");
    }

    #[test]
    fn substitute_appends_when_placeholder_absent() {
        let mut doc = DocumentBuffer::new("Document body.");
        doc.substitute_placeholder("[SLOT]", "replacement text");
        assert_eq!(doc.as_str(), "Document body.\n\nreplacement text");
        assert!(doc.as_str().len() >= "Document body.".len() + "replacement text".len());
    }

    #[test]
    fn heading_region_bounded_by_next_heading() {
        let mut doc = DocumentBuffer::new(
            "## Findings\n\n### Generic Criteria\nold generic body\nmore old lines\n\n## Plan\nsteps",
        );
        doc.replace_heading_region("### Generic Criteria", "### Specific Criteria\nnew body");
        assert!(!doc.as_str().contains("old generic body"));
        assert!(doc.as_str().contains("### Specific Criteria\nnew body"));
        assert!(doc.as_str().contains("## Plan\nsteps"));
    }

    #[test]
    fn heading_region_bounded_by_blank_line_when_no_heading_follows() {
        let mut doc = DocumentBuffer::new("### Generic Criteria\nold body\n\ntrailing paragraph");
        doc.replace_heading_region("### Generic Criteria", "replacement");
        assert!(!doc.as_str().contains("old body"));
        assert!(doc.as_str().contains("replacement"));
        assert!(doc.as_str().contains("trailing paragraph"));
    }

    #[test]
    fn heading_region_extends_to_document_end_without_boundaries() {
        let mut doc = DocumentBuffer::new("### Generic Criteria\nline one\nline two");
        doc.replace_heading_region("### Generic Criteria", "replacement");
        assert_eq!(doc.as_str(), "replacement");
    }

    #[test]
    fn heading_absent_appends_replacement() {
        let mut doc = DocumentBuffer::new("Body without the heading.");
        doc.replace_heading_region("### Generic Criteria", "appended section");
        assert_eq!(doc.as_str(), "Body without the heading.\n\nappended section");
    }

    #[test]
    fn append_section_separates_with_blank_line() {
        let mut doc = DocumentBuffer::new("First.");
        doc.append_section("Second.");
        assert_eq!(doc.as_str(), "First.\n\nSecond.");
    }

    #[test]
    fn append_empty_section_is_noop() {
        let mut doc = DocumentBuffer::new("Only.");
        doc.append_section("   ");
        assert_eq!(doc.as_str(), "Only.");
    }

    #[test]
    fn append_to_empty_buffer_has_no_leading_separator() {
        let mut doc = DocumentBuffer::new("");
        doc.append_section("Content.");
        assert_eq!(doc.as_str(), "Content.");
    }
}
