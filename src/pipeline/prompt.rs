//! Prompt construction for every generation stage.
//!
//! The clinical instruction text is condensed to the structural elements the
//! assembly pipeline depends on: the insertion placeholder, the checklist
//! markers, the three-part diagnosis format, and the missing-data sentinel.
//! All of these are literals from `templates`; prompts must quote them
//! exactly or downstream marker detection fails.

use super::context::ContextBundle;
use super::templates::{
    ASSESSMENT_HEADING, ASSESSMENT_PLACEHOLDER, CHECKLIST_TEMPLATE, ELABORATION_HEADING,
    LITERATURE_HEADING, MISSING_INFO_SENTINEL,
};

/// At most this many abstracts are quoted in the literature prompt.
const MAX_CONTEXT_ABSTRACTS: usize = 5;

/// Combined abstract text is capped at this many characters.
const MAX_CONTEXT_LENGTH: usize = 15_000;

pub const MAIN_NOTE_SYSTEM: &str = "\
You are a neurology resident drafting a structured clinic note for a cognitive disorders visit. \
Complete every clinical section from the provided patient data only: timeline of symptoms, HPI \
(at least three paragraphs), risk factors, family history, previous workup, cognitive and motor \
symptoms, functional assessment, histories, review of systems, examination, and vitals. \
Do not include dates. Do not invent data.";

pub const ASSESSMENT_SYSTEM: &str = "\
You are a neurological diagnostic assistant focused on cognitive disorders. Structure your \
response with the subheadings \"## Medical Explanation\", \"## Plan Rationale\", and \"## Plan\". \
Include a disclaimer that this is an AI-generated assessment requiring clinical correlation.";

pub const EXTRACTION_SYSTEM: &str = "\
You extract a single diagnosis name from clinical assessment text. \
Respond with the diagnosis name only, no explanations.";

pub const CHECKLIST_SYSTEM: &str = "\
You populate a clinical candidate checklist strictly from provided patient data. \
Retain the exact structure and headings of the template. Do not infer information.";

pub const ELABORATION_SYSTEM: &str = "\
You analyze patient data against standard diagnostic criteria for Alzheimer's Disease, \
stating per criterion whether the findings SUPPORT it, DO NOT SUPPORT it, or information is LACKING. \
Maintain a clinical and objective tone.";

pub const LITERATURE_SYSTEM: &str = "\
You summarize clinical practice guidelines from provided abstracts for a clinic note. \
Never cite guidelines that are not in the provided abstracts.";

/// Prompt for the main note body (stage 2).
pub fn build_main_note_prompt(bundle: &ContextBundle) -> String {
    format!(
        "PATIENT DATA START\n\
         ---\n\
         I. {historical}\n\
         ---\n\
         II. {current}\n\
         ---\n\
         III. {insights}\n\
         ---\n\
         PATIENT DATA END\n\n\
         Generate the structured neurology note now from ALL the provided patient data.\n\
         For any clinical section lacking data in the input, write \"{sentinel}\".\n\
         Include this placeholder line verbatim where the detailed medical explanation and plan belong:\n\
         {placeholder}\n\
         Do not generate the detailed medical explanation, differentials, or plan in this step.",
        historical = bundle.historical(),
        current = bundle.current_visit(),
        insights = bundle.insights(),
        sentinel = MISSING_INFO_SENTINEL,
        placeholder = ASSESSMENT_PLACEHOLDER,
    )
}

/// Prompt for the diagnostic assessment (stage 3). Takes the merged context
/// shapes: history+transcription as one block, insights+revisions as another.
pub fn build_assessment_prompt(merged_history: &str, merged_insights: &str) -> String {
    format!(
        "Base your assessment on ALL the following patient data.\n\n\
         PATIENT DATA START\n\
         ---\n\
         I. BACKGROUND AND CURRENT VISIT INFORMATION:\n{merged_history}\n\
         ---\n\
         II. CLINICIAN INSIGHTS AND REVISIONS:\n{merged_insights}\n\
         ---\n\
         PATIENT DATA END\n\n\
         Generate the comprehensive neurological assessment now, beginning with \"{ASSESSMENT_HEADING}\".\n\
         State the most likely diagnosis in EXACTLY this format, even if parts are unknown:\n\
         **Most Likely Diagnosis:** 1- [Severity, e.g. Mild Dementia or Unknown Severity], \
         2- [Clinical Syndrome, e.g. Amnestic Presentation or Unknown Syndrome], \
         3- [Suspected Underlying Pathology, e.g. Alzheimer's Disease or Unknown Pathology].\n\
         Follow with differential diagnoses, reasoning, missing information, \"## Plan Rationale\", and \"## Plan\"."
    )
}

/// Prompt for the fallback diagnosis extraction (classifier tier 2).
pub fn build_extraction_prompt(assessment: &str) -> String {
    format!(
        "From the following clinical assessment text, find the section titled \"Most Likely Diagnosis:\".\n\
         Extract the single most specific primary diagnosis stated after this title — usually the \
         pathology part of a \"1- Severity, 2- Syndrome, 3- Pathology\" line.\n\
         Respond with ONLY the diagnosis name. Do not include \"1-\", \"2-\", \"3-\", surrounding text, \
         or the heading itself.\n\
         If no clear single diagnosis is found, respond with \"NONE\".\n\n\
         Clinical Assessment Text to Analyze:\n\
         ---\n{assessment}\n---\n\n\
         Primary diagnosis:"
    )
}

/// Prompt for populating the clean checklist template (stage 6).
pub fn build_checklist_prompt(bundle: &ContextBundle, assessment: &str) -> String {
    format!(
        "Populate the candidate checklist below strictly from the provided patient data and assessment.\n\
         Replace '***' placeholders with specific data when present in the context; otherwise leave them unchanged.\n\
         For each exclusion item replace \"No / YES / UNKNOWN\" with exactly one of the three options.\n\
         Evaluate the inclusion criteria first; if they are definitively not met, replace the OTHER DATA \
         and EXCLUSION CRITERIA section bodies with \"NOT APPLICABLE - Inclusion criteria not met.\"\n\n\
         CONTEXT (Patient Data and Full Diagnostic Assessment):\n\
         ---\n\
         {historical}\n\n{current}\n\n{insights}\n\n\
         FULL DIAGNOSTIC ASSESSMENT:\n{assessment}\n\
         ---\n\n\
         CHECKLIST TEMPLATE TO POPULATE:\n\
         ---\n{template}\n---\n\n\
         Populate the checklist now:",
        historical = bundle.historical(),
        current = bundle.current_visit(),
        insights = bundle.insights(),
        template = CHECKLIST_TEMPLATE,
    )
}

/// Prompt for the patient-specific criteria elaboration (stage 8).
pub fn build_elaboration_prompt(diagnosis: &str, bundle: &ContextBundle, assessment: &str) -> String {
    format!(
        "The patient's primary diagnosis appears to be '{diagnosis}'.\n\
         Produce a section titled \"{ELABORATION_HEADING}\".\n\
         List the key diagnostic criteria for Alzheimer's Disease; for EACH criterion give a one-sentence \
         explanation, then state how the patient's specific findings SUPPORT or DO NOT SUPPORT it (or that \
         information is LACKING), quoting data points from the context.\n\n\
         CONTEXT (Patient Data and Full Diagnostic Assessment):\n\
         ---\n\
         {historical}\n\n{current}\n\n{insights}\n\n\
         FULL DIAGNOSTIC ASSESSMENT:\n{assessment}\n\
         ---\n\n\
         Generate the section now:",
        historical = bundle.historical(),
        current = bundle.current_visit(),
        insights = bundle.insights(),
    )
}

/// Prompt for the literature summary (stage 10). Quotes at most
/// `MAX_CONTEXT_ABSTRACTS` abstracts within the context budget; an abstract
/// that would overflow the budget is skipped, a smaller later one may still fit.
pub fn build_literature_prompt(abstracts: &[String], diagnosis: &str) -> String {
    let mut context_abstracts: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for abstract_text in abstracts {
        if context_abstracts.len() >= MAX_CONTEXT_ABSTRACTS {
            break;
        }
        if current_length + abstract_text.len() >= MAX_CONTEXT_LENGTH {
            continue;
        }
        context_abstracts.push(abstract_text);
        current_length += abstract_text.len();
    }

    let context = context_abstracts.join("\n\n---\n\n");

    format!(
        "Based on the following abstracts related to '{diagnosis}', write the \"{LITERATURE_HEADING}\" \
         section of a clinical note.\n\
         Select the 2-3 most relevant guidelines, summarize their key recommendations for '{diagnosis}', \
         and comment briefly on each guideline's relevance. Format as a numbered list starting with the \
         heading \"{LITERATURE_HEADING}\". If fewer than 2 relevant guidelines appear in the abstracts, \
         state that under the heading.\n\n\
         Abstracts Provided:\n\
         ---\n{context}\n---\n\n\
         Generate the \"{LITERATURE_HEADING}\" section now:"
    )
}
