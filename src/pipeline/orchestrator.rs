//! Drives one note-generation run end to end.
//!
//! Two generation calls are load-bearing: the main note body and the
//! diagnostic assessment. Everything after them is enrichment and degrades
//! to a sensible fallback instead of failing the run, so transient service
//! trouble can never cost the clinician the core note.

use crate::config::NoteConfig;
use crate::literature::LiteratureSearch;
use crate::llm::{LlmClient, LlmError};

use super::context::{ContextBundle, RawInputs};
use super::diagnosis;
use super::markers::{DocumentBuffer, ExtractOutcome};
use super::missing;
use super::prompt;
use super::templates::{
    ASSESSMENT_HEADING, ASSESSMENT_PLACEHOLDER, CHECKLIST_END_MARKER, CHECKLIST_START_MARKER,
    CHECKLIST_TEMPLATE, ELABORATION_HEADING, GENERIC_CRITERIA_HEADING, LITERATURE_HEADING,
    MISSING_INFO_SENTINEL, SIGNATURE,
};
use super::types::{DiagnosisClassification, FragmentKind, GeneratedFragment};
use super::NoteError;

/// Assembles one note per call from raw clinician input.
pub struct NotePipeline<'a, G: LlmClient, S: LiteratureSearch> {
    llm: &'a G,
    literature: &'a S,
    config: NoteConfig,
}

impl<'a, G: LlmClient, S: LiteratureSearch> NotePipeline<'a, G, S> {
    pub fn new(llm: &'a G, literature: &'a S, config: NoteConfig) -> Self {
        Self {
            llm,
            literature,
            config,
        }
    }

    /// Run the full assembly and return the finished note.
    ///
    /// Fails only when the main body or assessment cannot be generated;
    /// every enrichment stage substitutes a fallback on error.
    pub fn generate_note(&self, inputs: &RawInputs) -> Result<String, NoteError> {
        let bundle = ContextBundle::from_raw(inputs);

        let main_body = self
            .generate_fragment(
                FragmentKind::MainBody,
                &prompt::build_main_note_prompt(&bundle),
                prompt::MAIN_NOTE_SYSTEM,
            )
            .map_err(NoteError::NoteBody)?;

        let assessment = self
            .generate_fragment(
                FragmentKind::DiagnosticAssessment,
                &prompt::build_assessment_prompt(&bundle.merged_history(), &bundle.insights()),
                prompt::ASSESSMENT_SYSTEM,
            )
            .map_err(NoteError::Assessment)?;
        let assessment = ensure_heading(&assessment.text, ASSESSMENT_HEADING);

        let classification = diagnosis::classify(&assessment, self.llm, &self.config.model);
        match &classification {
            Some(c) => tracing::info!(diagnosis = %c.label, alzheimers = c.alzheimers_primary, "primary diagnosis classified"),
            None => tracing::warn!("no primary diagnosis could be classified"),
        }
        let ad_primary = classification
            .as_ref()
            .is_some_and(|c| c.alzheimers_primary);

        let mut doc = DocumentBuffer::new(main_body.text);

        // The body's own checklist copy is always removed; a populated one is
        // re-appended at the end only when Alzheimer's is the primary pathology.
        let template_present = match doc.extract_and_remove(CHECKLIST_START_MARKER, CHECKLIST_END_MARKER)
        {
            ExtractOutcome::Removed(_) => true,
            ExtractOutcome::NotPresent | ExtractOutcome::Malformed => false,
        };

        let checklist = if template_present && ad_primary {
            Some(self.populate_checklist(&bundle, &assessment))
        } else {
            if template_present {
                tracing::info!("checklist omitted, primary diagnosis is not Alzheimer's");
            }
            None
        };

        doc.substitute_placeholder(ASSESSMENT_PLACEHOLDER, &assessment);

        if ad_primary {
            if let Some(classification) = &classification {
                self.elaborate_criteria(&mut doc, classification, &bundle, &assessment);
            }
        }

        if let Some(checklist) = checklist {
            doc.append_section(&checklist);
        }

        doc.append_section(&self.literature_section(classification.as_ref()));

        // Gaps are scanned before the fixed closing blocks join the document.
        let missing_summary = missing::missing_info_summary(doc.as_str());
        doc.append_section(SIGNATURE);
        doc.append_section(&missing_summary);

        tracing::info!(chars = doc.as_str().len(), "note assembly complete");
        Ok(doc.into_string())
    }

    /// One generation call, tagged with its stage for logging.
    fn generate_fragment(
        &self,
        kind: FragmentKind,
        prompt: &str,
        system: &str,
    ) -> Result<GeneratedFragment, LlmError> {
        tracing::info!(stage = kind.as_str(), model = %self.config.model, "generating fragment");
        let text = self.llm.generate(&self.config.model, prompt, system)?;
        tracing::debug!(stage = kind.as_str(), chars = text.len(), "fragment generated");
        Ok(GeneratedFragment { kind, text })
    }

    /// Populate the clean checklist template from patient data. Falls back to
    /// the unfilled template on generation failure.
    fn populate_checklist(&self, bundle: &ContextBundle, assessment: &str) -> String {
        match self.generate_fragment(
            FragmentKind::Checklist,
            &prompt::build_checklist_prompt(bundle, assessment),
            prompt::CHECKLIST_SYSTEM,
        ) {
            Ok(filled) => anchor_checklist(&filled.text),
            Err(e) => {
                tracing::warn!(error = %e, "checklist population failed; using unfilled template");
                CHECKLIST_TEMPLATE.to_string()
            }
        }
    }

    /// Replace the generic criteria section with a patient-specific
    /// elaboration. Leaves the generic section in place on failure.
    fn elaborate_criteria(
        &self,
        doc: &mut DocumentBuffer,
        classification: &DiagnosisClassification,
        bundle: &ContextBundle,
        assessment: &str,
    ) {
        match self.generate_fragment(
            FragmentKind::Elaboration,
            &prompt::build_elaboration_prompt(&classification.label, bundle, assessment),
            prompt::ELABORATION_SYSTEM,
        ) {
            Ok(elaboration) => {
                let section = ensure_heading(&elaboration.text, ELABORATION_HEADING);
                doc.replace_heading_region(GENERIC_CRITERIA_HEADING, &section);
            }
            Err(e) => {
                tracing::warn!(error = %e, "criteria elaboration failed; generic section kept");
            }
        }
    }

    /// Build the literature summary section, degrading to a fixed sentinel
    /// when no diagnosis was classified, search fails, or nothing is found.
    fn literature_section(&self, classification: Option<&DiagnosisClassification>) -> String {
        let Some(classification) = classification else {
            return format!(
                "{LITERATURE_HEADING}\n\n{MISSING_INFO_SENTINEL} (Diagnosis not extracted)"
            );
        };

        let diagnosis = &classification.label;
        tracing::info!(%diagnosis, "searching recent practice guidelines");

        let abstracts = match self.literature.search(diagnosis, self.config.max_guideline_results) {
            Ok(abstracts) => abstracts,
            Err(e) => {
                tracing::warn!(error = %e, "guideline search failed");
                Vec::new()
            }
        };

        if abstracts.is_empty() {
            return format!(
                "{LITERATURE_HEADING}\n\nNo recent relevant guidelines found for '{diagnosis}'."
            );
        }

        match self.generate_fragment(
            FragmentKind::LiteratureSummary,
            &prompt::build_literature_prompt(&abstracts, diagnosis),
            prompt::LITERATURE_SYSTEM,
        ) {
            Ok(summary) => ensure_heading(&summary.text, LITERATURE_HEADING),
            Err(e) => {
                tracing::warn!(error = %e, "literature summarization failed");
                format!("{LITERATURE_HEADING}\n\nNo recent relevant guidelines found for '{diagnosis}'.")
            }
        }
    }
}

/// Prepend `heading` unless the text already starts with it (any case).
fn ensure_heading(text: &str, heading: &str) -> String {
    let trimmed = text.trim();
    if trimmed.to_lowercase().starts_with(&heading.to_lowercase()) {
        trimmed.to_string()
    } else {
        format!("{heading}\n\n{trimmed}")
    }
}

/// Re-anchor a populated checklist at its start marker, discarding any
/// preamble the generation service added. Output without markers is wrapped
/// so later marker-based passes still find the section.
fn anchor_checklist(filled: &str) -> String {
    let trimmed = filled.trim();

    let Some(start) = trimmed.find(CHECKLIST_START_MARKER) else {
        tracing::warn!("populated checklist lost its markers; re-wrapping");
        return format!("{CHECKLIST_START_MARKER}\n{trimmed}\n{CHECKLIST_END_MARKER}");
    };

    let anchored = &trimmed[start..];
    match anchored.find(CHECKLIST_END_MARKER) {
        Some(end) => anchored[..end + CHECKLIST_END_MARKER.len()].to_string(),
        None => format!("{}\n{CHECKLIST_END_MARKER}", anchored.trim_end()),
    }
}
