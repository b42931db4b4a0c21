//! Biomedical literature lookup via the NCBI E-utilities.
//!
//! The pipeline only needs "diagnosis in, abstract strings out"; everything
//! else (PMID resolution, abstract cleanup) stays behind the
//! `LiteratureSearch` trait.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::config::NoteConfig;

/// PubMed E-utilities endpoint.
const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// E-utilities responses are small; generation-scale timeouts don't apply.
const EUTILS_TIMEOUT_SECS: u64 = 30;

/// Abstracts shorter than this after cleanup are citation noise, not content.
const MIN_ABSTRACT_LEN: usize = 50;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("literature service is not reachable at {0}")]
    Connection(String),

    #[error("literature service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),
}

/// Literature search abstraction (allows mocking).
///
/// Returns abstract texts most relevant to the term; an empty vector means
/// no results, which callers treat the same as a failed transport.
pub trait LiteratureSearch {
    fn search(&self, term: &str, max_results: usize) -> Result<Vec<String>, SearchError>;
}

/// PubMed client restricted to practice-guideline publications.
pub struct EntrezClient {
    base_url: String,
    email: String,
    client: reqwest::blocking::Client,
}

impl EntrezClient {
    pub fn new(email: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: EUTILS_BASE.to_string(),
            email: email.to_string(),
            client,
        }
    }

    /// Client configured from a `NoteConfig` (NCBI contact e-mail).
    pub fn from_config(config: &NoteConfig) -> Self {
        Self::new(&config.contact_email, EUTILS_TIMEOUT_SECS)
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response, SearchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("tool", crate::config::APP_NAME), ("email", self.email.as_str())])
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SearchError::Connection(self.base_url.clone())
                } else {
                    SearchError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    fn search_ids(&self, term: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let retmax = max_results.to_string();
        let response = self.get(
            &url,
            &[
                ("db", "pubmed"),
                ("term", term),
                ("retmax", retmax.as_str()),
                ("sort", "relevance"),
                ("retmode", "json"),
            ],
        )?;

        let parsed: EsearchResponse = response
            .json()
            .map_err(|e| SearchError::ResponseParsing(e.to_string()))?;

        Ok(parsed.esearchresult.idlist)
    }

    fn fetch_abstracts(&self, ids: &[String]) -> Result<String, SearchError> {
        let url = format!("{}/efetch.fcgi", self.base_url);
        let id_list = ids.join(",");
        let response = self.get(
            &url,
            &[
                ("db", "pubmed"),
                ("id", id_list.as_str()),
                ("rettype", "abstract"),
                ("retmode", "text"),
            ],
        )?;

        response
            .text()
            .map_err(|e| SearchError::ResponseParsing(e.to_string()))
    }
}

/// Response body from esearch.fcgi (retmode=json)
#[derive(Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

impl LiteratureSearch for EntrezClient {
    fn search(&self, term: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let query = guideline_search_term(term);
        let ids = self.search_ids(&query, max_results)?;
        if ids.is_empty() {
            tracing::debug!(term, "no guideline IDs found on PubMed");
            return Ok(Vec::new());
        }

        let raw = self.fetch_abstracts(&ids)?;
        let abstracts = clean_abstracts(&raw);
        tracing::debug!(term, count = abstracts.len(), "fetched guideline abstracts");
        Ok(abstracts)
    }
}

/// Build the PubMed query restricting results to practice guidelines.
pub fn guideline_search_term(diagnosis: &str) -> String {
    format!(
        "(\"{d}\"[MeSH Terms] OR \"{d}\"[Title/Abstract]) AND \
         (\"guideline\"[Publication Type] OR \"practice guideline\"[Publication Type])",
        d = diagnosis
    )
}

static LEADING_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*").unwrap());
static LEADING_PMID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*PMID-\s*\d+\s*").unwrap());

/// Split an efetch text blob into individual cleaned abstracts.
///
/// Strips the leading "N." ordinal and "PMID-" prefix each record carries,
/// and drops fragments too short to be actual abstract text.
pub fn clean_abstracts(raw: &str) -> Vec<String> {
    raw.trim()
        .split("\n\n")
        .map(|part| {
            let cleaned = LEADING_ORDINAL.replace(part, "");
            LEADING_PMID.replace(&cleaned, "").trim().to_string()
        })
        .filter(|a| a.len() > MIN_ABSTRACT_LEN)
        .collect()
}

/// Mock literature search for testing — returns configured abstracts.
pub struct MockLiteratureSearch {
    results: Vec<String>,
}

impl MockLiteratureSearch {
    pub fn new(results: Vec<String>) -> Self {
        Self { results }
    }

    pub fn empty() -> Self {
        Self { results: Vec::new() }
    }
}

impl LiteratureSearch for MockLiteratureSearch {
    fn search(&self, _term: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guideline_term_includes_publication_type_filter() {
        let term = guideline_search_term("Alzheimer's Disease");
        assert!(term.contains("\"Alzheimer's Disease\"[MeSH Terms]"));
        assert!(term.contains("\"practice guideline\"[Publication Type]"));
    }

    #[test]
    fn clean_abstracts_strips_ordinals_and_pmids() {
        let raw = "1. This is the first guideline abstract with enough text to be kept around.\n\n\
                   PMID- 12345 Second guideline abstract, also long enough to survive the filter.";
        let abstracts = clean_abstracts(raw);
        assert_eq!(abstracts.len(), 2);
        assert!(abstracts[0].starts_with("This is the first"));
        assert!(abstracts[1].starts_with("Second guideline"));
    }

    #[test]
    fn clean_abstracts_drops_short_fragments() {
        let raw = "Too short.\n\nThis fragment, on the other hand, is comfortably longer than the cutoff length.";
        let abstracts = clean_abstracts(raw);
        assert_eq!(abstracts.len(), 1);
    }

    #[test]
    fn clean_abstracts_empty_input() {
        assert!(clean_abstracts("").is_empty());
    }

    #[test]
    fn from_config_carries_contact_email() {
        let config = NoteConfig {
            contact_email: "clinic@example.org".into(),
            ..NoteConfig::default()
        };
        let client = EntrezClient::from_config(&config);
        assert_eq!(client.email, "clinic@example.org");
        assert_eq!(client.base_url, EUTILS_BASE);
    }

    #[test]
    fn mock_search_respects_max_results() {
        let mock = MockLiteratureSearch::new(vec!["a".into(), "b".into(), "c".into()]);
        let results = mock.search("dementia", 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn mock_search_empty_returns_no_results() {
        let mock = MockLiteratureSearch::empty();
        assert!(mock.search("dementia", 5).unwrap().is_empty());
    }
}
