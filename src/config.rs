//! Runtime configuration for note generation.
//!
//! Everything the orchestrator needs to talk to its collaborators lives here
//! as an explicit value, not ambient state: model name, generation endpoint,
//! timeouts, and literature-search etiquette parameters.

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "neuronote";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", APP_NAME)
}

/// Configuration passed into `NotePipeline` at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteConfig {
    /// Model name passed to the generation service on every call.
    pub model: String,
    /// Base URL of the text-generation service.
    pub generation_base_url: String,
    /// Per-request timeout for generation calls, in seconds.
    pub generation_timeout_secs: u64,
    /// Contact e-mail sent with literature-search requests (NCBI etiquette).
    pub contact_email: String,
    /// Maximum number of guideline abstracts to fetch per diagnosis.
    pub max_guideline_results: usize,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            model: "medgemma".into(),
            generation_base_url: "http://localhost:11434".into(),
            generation_timeout_secs: 300,
            contact_email: "neuronote@localhost".into(),
            max_guideline_results: 5,
        }
    }
}
