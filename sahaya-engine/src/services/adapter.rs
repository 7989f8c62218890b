//! AI and web-search adapter seams
//!
//! The resolver and the ranking pipeline talk to external AI backends
//! through these traits so tests can substitute in-process fakes and so
//! an unconfigured deployment degrades to matching against stored data
//! only. `Unavailable` is distinct from an empty result: an empty result
//! is an answer, `Unavailable` means the backend could not be asked.

use async_trait::async_trait;
use sahaya_common::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Adapter errors
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter not configured")]
    Unavailable,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// An existing concept, as presented to the AI backend
#[derive(Debug, Clone, Serialize)]
pub struct TopicRef {
    pub id: String,
    pub name: String,
}

/// One ranked concept returned by the AI backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub relevance: f64,
}

/// A proposed brand-new concept, with translations and synonym sets
#[derive(Debug, Clone, Default)]
pub struct NewTopicProposal {
    /// Machine id, lowercase snake_case as proposed
    pub id: Option<String>,
    /// English display name
    pub name: Option<String>,
    pub description_hi: Option<String>,
    pub description_kn: Option<String>,
    pub synonyms_en: Vec<String>,
    pub synonyms_hi: Vec<String>,
    pub synonyms_kn: Vec<String>,
}

/// Translation output
#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub text: String,
    /// Source language when the backend could detect it
    pub source_language: Option<Language>,
}

/// One web search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// Language-model operations used by the resolver and the pipeline
#[async_trait]
pub trait AiAdapter: Send + Sync {
    /// Rank existing concepts by relevance to a raw query, best first
    async fn rank_existing_topics(
        &self,
        query: &str,
        topics: &[TopicRef],
    ) -> Result<Vec<TopicMatch>, AdapterError>;

    /// Propose a new concept when nothing existing fits
    async fn propose_new_topic(
        &self,
        title: &str,
        description: &str,
        topics: &[TopicRef],
    ) -> Result<NewTopicProposal, AdapterError>;

    /// Translate text to the target language
    async fn translate(
        &self,
        text: &str,
        target: Language,
    ) -> Result<TranslationResult, AdapterError>;

    /// Produce a short teacher-facing summary of a resource
    async fn summarize(
        &self,
        title: &str,
        snippet: &str,
        topic: &str,
        elaboration: Option<&str>,
    ) -> Result<String, AdapterError>;
}

/// Web search used as the last resort of the ranking pipeline
#[async_trait]
pub trait WebSearchAdapter: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        elaboration: Option<&str>,
    ) -> Result<Vec<SearchHit>, AdapterError>;
}
