//! Domain models shared across crates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Canonical teaching topic
///
/// `concept_id` is a human-readable identifier (e.g. `SCI_BIO_PHOTOSYNTHESIS`)
/// and is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: String,
    pub subject: String,
    pub description_en: Option<String>,
    pub description_hi: Option<String>,
    pub description_kn: Option<String>,
    /// Free-form grade level, or "all"
    pub grade: String,
}

impl Concept {
    /// Human-readable name used for prompts and web-search queries:
    /// the English description when present, else the id with
    /// underscores replaced by spaces.
    pub fn display_name(&self) -> String {
        match &self.description_en {
            Some(desc) if !desc.trim().is_empty() => desc.clone(),
            _ => self.concept_id.replace('_', " "),
        }
    }

    /// Description in the requested language, falling back to English
    pub fn description_for(&self, language: Language) -> Option<&str> {
        let preferred = match language {
            Language::En => &self.description_en,
            Language::Hi => &self.description_hi,
            Language::Kn => &self.description_kn,
        };
        preferred.as_deref().or(self.description_en.as_deref())
    }
}

/// One language-tagged term mapping to a concept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptSynonym {
    pub id: String,
    pub concept_id: String,
    pub language: Language,
    pub term: String,
}

/// Where a content item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Uploaded by a user of this system
    Internal,
    /// Discovered via web search
    External,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Internal => "internal",
            SourceType::External => "external",
        }
    }

    pub fn parse(s: &str) -> Option<SourceType> {
        match s {
            "internal" => Some(SourceType::Internal),
            "external" => Some(SourceType::External),
            _ => None,
        }
    }
}

/// Supporting material attached to a concept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub concept_id: String,
    pub uploaded_by: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub language: Language,
    /// Free-form tag: video, document, activity, tip, article, ...
    pub content_type: String,
    pub title: String,
    pub content_url: String,
    pub description: Option<String>,
    /// AI-generated short summary, present on web-discovered items
    pub summary: Option<String>,
    pub source_type: SourceType,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// One teacher's verdict on one content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFeedback {
    pub id: String,
    pub content_id: String,
    pub teacher_id: Option<String>,
    pub worked: bool,
    /// 1..=5 when present
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derived feedback aggregate, computed on demand and never stored
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeedbackStats {
    /// Mean of recorded ratings, 0.0 when none
    pub avg_rating: f64,
    /// Fraction of feedback rows with `worked = true`, in 0..=1
    pub success_ratio: f64,
    pub feedback_count: i64,
}

impl FeedbackStats {
    /// Combined score used to re-sort items within an already-chosen tier
    pub fn score(&self) -> f64 {
        self.avg_rating + self.success_ratio
    }
}

/// Audit row persisted per resolution attempt, for gap analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub query_text: String,
    pub detected_language: Language,
    pub normalized_text: String,
    /// None when the cascade terminated without a match
    pub concept_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Which ranking tier produced a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLabel {
    /// Verified material (internal or any verified source)
    Internal,
    /// Unverified material uploaded to this system
    InternalUnverified,
    /// Previously discovered external material
    ExternalFallback,
    /// Fresh live web-search results
    WebSearch,
}

impl SourceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLabel::Internal => "internal",
            SourceLabel::InternalUnverified => "internal_unverified",
            SourceLabel::ExternalFallback => "external_fallback",
            SourceLabel::WebSearch => "web_search",
        }
    }
}
