//! Multi-stage clinical note assembly.
//!
//! One run turns raw clinician input into a finished neurology note: the
//! main body and diagnostic assessment are generated separately, spliced
//! together at a fixed placeholder, then enriched with conditional sections
//! (candidate checklist, criteria elaboration, literature summary) and
//! closed with a missing-information summary and signature.

use thiserror::Error;

use crate::llm::LlmError;

pub mod context;
pub mod diagnosis;
pub mod markers;
pub mod missing;
pub mod orchestrator;
pub mod prompt;
pub mod templates;
pub mod types;

/// Failure of a stage the note cannot be assembled without.
///
/// Enrichment stages degrade instead of failing; only the two core
/// generation calls surface here.
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("main note body generation failed: {0}")]
    NoteBody(#[source] LlmError),

    #[error("diagnostic assessment generation failed: {0}")]
    Assessment(#[source] LlmError),
}
