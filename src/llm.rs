//! Text-generation service client.
//!
//! The pipeline only depends on the `LlmClient` trait; the concrete client
//! talks to a local Ollama instance over its blocking HTTP API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NoteConfig;

/// Model lookup order: clinical models first, then a general fallback.
const PREFERRED_MODELS: &[&str] = &[
    "medgemma",
    "medgemma:27b",
    "medgemma:4b",
    "medgemma:latest",
    "llama3.1",
];

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("generation service is not running at {0}")]
    Connection(String),

    #[error("generation service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("no compatible model available")]
    NoModelAvailable,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),
}

/// Text-generation abstraction (allows mocking).
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError>;

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError>;

    fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new client pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client configured from a `NoteConfig`.
    pub fn from_config(config: &NoteConfig) -> Self {
        Self::new(&config.generation_base_url, config.generation_timeout_secs)
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", 300)
    }

    /// First entry of the preference list with an installed match.
    pub fn find_best_model(&self) -> Result<String, LlmError> {
        let available = self.list_models()?;
        pick_preferred(&available)
            .map(str::to_string)
            .ok_or(LlmError::NoModelAvailable)
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }
}

/// Walk the preference list and return the first entry some installed model
/// name starts with (tag variants like "medgemma:27b-q4" count).
fn pick_preferred(available: &[String]) -> Option<&'static str> {
    PREFERRED_MODELS
        .iter()
        .find(|preferred| available.iter().any(|m| m.starts_with(*preferred)))
        .copied()
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Test double: fixed response text, configurable model list, optional
/// connection failure.
pub struct MockLlmClient {
    response: String,
    available_models: Vec<String>,
    fail: bool,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            available_models: vec!["medgemma:latest".to_string()],
            fail: false,
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Every call fails as if the service were down.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            available_models: Vec::new(),
            fail: true,
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        if self.fail {
            return Err(LlmError::Connection("http://mock".into()));
        }
        Ok(self.response.clone())
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        if self.fail {
            return Err(LlmError::Connection("http://mock".into()));
        }
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        if self.fail {
            return Err(LlmError::Connection("http://mock".into()));
        }
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_preferred_favors_clinical_model_over_fallback() {
        let available = vec!["llama3.1:8b".to_string(), "medgemma:27b".to_string()];
        assert_eq!(pick_preferred(&available), Some("medgemma"));
    }

    #[test]
    fn pick_preferred_matches_tag_variants() {
        let available = vec!["medgemma:4b-it-q8_0".to_string()];
        assert_eq!(pick_preferred(&available), Some("medgemma"));
    }

    #[test]
    fn pick_preferred_falls_back_to_general_model() {
        let available = vec!["llama3.1:70b".to_string(), "qwen2:7b".to_string()];
        assert_eq!(pick_preferred(&available), Some("llama3.1"));
    }

    #[test]
    fn pick_preferred_empty_when_nothing_matches() {
        let available = vec!["phi3:mini".to_string()];
        assert_eq!(pick_preferred(&available), None);
    }

    #[test]
    fn connection_error_names_the_endpoint() {
        let e = LlmError::Connection("http://localhost:11434".into());
        assert!(e.to_string().contains("http://localhost:11434"));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let e = LlmError::Api {
            status: 503,
            body: "model loading".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("model loading"));
    }

    #[test]
    fn mock_round_trips_scripted_text_and_model_list() {
        let mock = MockLlmClient::new("scripted output")
            .with_models(vec!["medgemma:latest".into(), "llama3.1:8b".into()]);
        assert_eq!(mock.generate("m", "p", "s").unwrap(), "scripted output");
        assert!(mock.is_model_available("medgemma").unwrap());
        assert!(!mock.is_model_available("qwen2").unwrap());
        assert_eq!(mock.list_models().unwrap().len(), 2);
    }

    #[test]
    fn failing_mock_surfaces_connection_errors() {
        let mock = MockLlmClient::failing();
        assert!(matches!(mock.generate("m", "p", "s"), Err(LlmError::Connection(_))));
        assert!(matches!(mock.list_models(), Err(LlmError::Connection(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", 60);
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn from_config_uses_configured_endpoint() {
        let config = NoteConfig {
            generation_base_url: "http://10.0.0.5:11434".into(),
            generation_timeout_secs: 120,
            ..NoteConfig::default()
        };
        let client = OllamaClient::from_config(&config);
        assert_eq!(client.base_url, "http://10.0.0.5:11434");
        assert_eq!(client.timeout_secs, 120);
    }
}
