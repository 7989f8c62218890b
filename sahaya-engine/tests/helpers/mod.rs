//! Shared test fixtures
//!
//! In-memory pools pre-loaded with a small concept set, plus in-process
//! fakes for the adapter traits. Nothing here touches the network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sahaya_common::db::init_memory_database;
use sahaya_common::models::{Concept, ContentItem, SourceType};
use sahaya_common::Language;
use sqlx::SqlitePool;
use uuid::Uuid;

use sahaya_engine::db::{concepts, content, synonyms};
use sahaya_engine::services::{
    AdapterError, AiAdapter, NewTopicProposal, SearchHit, TopicMatch, TopicRef,
    TranslationResult, WebSearchAdapter,
};

/// Empty in-memory database with the full schema applied
pub async fn empty_pool() -> SqlitePool {
    init_memory_database().await.expect("in-memory database")
}

/// Pool pre-loaded with a handful of concepts and multilingual synonyms
pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;

    add_concept(
        &pool,
        "CLASSROOM_ATTENTION",
        "pedagogy",
        "Getting and maintaining student attention",
    )
    .await;
    add_synonym(&pool, "CLASSROOM_ATTENTION", Language::En, "student attention").await;
    add_synonym(
        &pool,
        "CLASSROOM_ATTENTION",
        Language::En,
        "students not listening",
    )
    .await;
    add_synonym(&pool, "CLASSROOM_ATTENTION", Language::Kn, "ಮಕ್ಕಳ ಗಮನ").await;
    add_synonym(&pool, "CLASSROOM_ATTENTION", Language::Hi, "छात्रों का ध्यान").await;

    add_concept(
        &pool,
        "SCI_BIO_PHOTOSYNTHESIS",
        "science",
        "Process by which plants make food using sunlight",
    )
    .await;
    add_synonym(&pool, "SCI_BIO_PHOTOSYNTHESIS", Language::En, "photosynthesis").await;
    add_synonym(
        &pool,
        "SCI_BIO_PHOTOSYNTHESIS",
        Language::En,
        "how plants make food",
    )
    .await;

    add_concept(&pool, "MATH_FRACTIONS", "math", "Parts of a whole number").await;
    add_synonym(&pool, "MATH_FRACTIONS", Language::En, "fractions").await;
    add_synonym(&pool, "MATH_FRACTIONS", Language::Hi, "भिन्न").await;

    add_concept(
        &pool,
        "SCI_ENV_WATER_CYCLE",
        "science",
        "Water cycle and evaporation",
    )
    .await;
    add_synonym(&pool, "SCI_ENV_WATER_CYCLE", Language::En, "water cycle").await;

    pool
}

pub async fn add_concept(pool: &SqlitePool, id: &str, subject: &str, description_en: &str) {
    concepts::insert_concept(
        pool,
        &Concept {
            concept_id: id.to_string(),
            subject: subject.to_string(),
            description_en: Some(description_en.to_string()),
            description_hi: None,
            description_kn: None,
            grade: "all".to_string(),
        },
    )
    .await
    .expect("insert concept");
}

pub async fn add_synonym(pool: &SqlitePool, concept_id: &str, language: Language, term: &str) {
    synonyms::insert_synonym(pool, concept_id, language, term)
        .await
        .expect("insert synonym");
}

/// Insert a content row with full control over verification and source.
/// `age_minutes` backdates `created_at` so recency ordering is testable.
pub async fn add_content(
    pool: &SqlitePool,
    concept_id: &str,
    url: &str,
    language: Language,
    verified: bool,
    source: SourceType,
    age_minutes: i64,
) -> ContentItem {
    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        concept_id: concept_id.to_string(),
        uploaded_by: None,
        subject: None,
        grade: None,
        language,
        content_type: "article".to_string(),
        title: format!("item {}", url),
        content_url: url.to_string(),
        description: None,
        summary: None,
        source_type: source,
        is_verified: verified,
        created_at: Utc::now() - chrono::Duration::minutes(age_minutes),
    };
    content::insert_or_fetch_by_url(pool, &item)
        .await
        .expect("insert content")
}

pub fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

/// AI fake with scripted answers and call counters
///
/// Unknown translation inputs echo back unchanged, which the cascade
/// treats as "translation did not help".
#[derive(Default)]
pub struct ScriptedAi {
    pub matches: Vec<TopicMatch>,
    pub proposal: Option<NewTopicProposal>,
    /// (input text, translated text) pairs
    pub translations: Vec<(String, String)>,
    pub summary: Option<String>,
    pub rank_calls: AtomicUsize,
    pub propose_calls: AtomicUsize,
    pub translate_calls: AtomicUsize,
    pub summarize_calls: AtomicUsize,
}

#[async_trait]
impl AiAdapter for ScriptedAi {
    async fn rank_existing_topics(
        &self,
        _query: &str,
        _topics: &[TopicRef],
    ) -> Result<Vec<TopicMatch>, AdapterError> {
        self.rank_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.matches.clone())
    }

    async fn propose_new_topic(
        &self,
        _title: &str,
        _description: &str,
        _topics: &[TopicRef],
    ) -> Result<NewTopicProposal, AdapterError> {
        self.propose_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.proposal.clone().unwrap_or_default())
    }

    async fn translate(
        &self,
        text: &str,
        _target: Language,
    ) -> Result<TranslationResult, AdapterError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        let translated = self
            .translations
            .iter()
            .find(|(input, _)| input == text)
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| text.to_string());
        Ok(TranslationResult {
            text: translated,
            source_language: None,
        })
    }

    async fn summarize(
        &self,
        _title: &str,
        _snippet: &str,
        _topic: &str,
        _elaboration: Option<&str>,
    ) -> Result<String, AdapterError> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        match &self.summary {
            Some(summary) => Ok(summary.clone()),
            None => Err(AdapterError::Unavailable),
        }
    }
}

/// AI fake whose every call fails as unconfigured
pub struct UnavailableAi;

#[async_trait]
impl AiAdapter for UnavailableAi {
    async fn rank_existing_topics(
        &self,
        _query: &str,
        _topics: &[TopicRef],
    ) -> Result<Vec<TopicMatch>, AdapterError> {
        Err(AdapterError::Unavailable)
    }

    async fn propose_new_topic(
        &self,
        _title: &str,
        _description: &str,
        _topics: &[TopicRef],
    ) -> Result<NewTopicProposal, AdapterError> {
        Err(AdapterError::Unavailable)
    }

    async fn translate(
        &self,
        _text: &str,
        _target: Language,
    ) -> Result<TranslationResult, AdapterError> {
        Err(AdapterError::Unavailable)
    }

    async fn summarize(
        &self,
        _title: &str,
        _snippet: &str,
        _topic: &str,
        _elaboration: Option<&str>,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::Unavailable)
    }
}

/// AI fake that stalls on the first call, for deadline tests
pub struct SlowAi {
    pub delay: Duration,
}

#[async_trait]
impl AiAdapter for SlowAi {
    async fn rank_existing_topics(
        &self,
        _query: &str,
        _topics: &[TopicRef],
    ) -> Result<Vec<TopicMatch>, AdapterError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn propose_new_topic(
        &self,
        _title: &str,
        _description: &str,
        _topics: &[TopicRef],
    ) -> Result<NewTopicProposal, AdapterError> {
        Err(AdapterError::Unavailable)
    }

    async fn translate(
        &self,
        _text: &str,
        _target: Language,
    ) -> Result<TranslationResult, AdapterError> {
        Err(AdapterError::Unavailable)
    }

    async fn summarize(
        &self,
        _title: &str,
        _snippet: &str,
        _topic: &str,
        _elaboration: Option<&str>,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::Unavailable)
    }
}

/// Web-search fake returning preset hits and recording the request
#[derive(Default)]
pub struct FakeWebSearch {
    pub hits: Vec<SearchHit>,
    pub calls: AtomicUsize,
    pub last_query: Mutex<Option<String>>,
    pub last_max_results: AtomicUsize,
}

#[async_trait]
impl WebSearchAdapter for FakeWebSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        _elaboration: Option<&str>,
    ) -> Result<Vec<SearchHit>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        self.last_max_results.store(max_results, Ordering::SeqCst);
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// Web-search fake that always fails at the transport layer
pub struct FailingWebSearch;

#[async_trait]
impl WebSearchAdapter for FailingWebSearch {
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
        _elaboration: Option<&str>,
    ) -> Result<Vec<SearchHit>, AdapterError> {
        Err(AdapterError::Transport("search backend down".to_string()))
    }
}
