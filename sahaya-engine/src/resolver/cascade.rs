//! Concept resolution cascade
//!
//! Turns a free-form teacher query in English, Hindi or Kannada into a
//! canonical concept id. Tiers run cheapest first and the first hit wins:
//!
//! 1. exact synonym equality
//! 2. query-inside-term substring
//! 3. keyword matching (English only)
//! 4. full synonym scan with containment both ways
//! 5. fuzzy matching for typos (English only)
//! 6. AI assistance: rank existing, propose new, translate and retry
//! 7. terminal no-match
//!
//! Raw Hindi/Kannada text is never used to search content directly; every
//! content lookup goes through the concept id this cascade produces.

use std::sync::Arc;
use std::time::Duration;

use sahaya_common::models::Concept;
use sahaya_common::{Error, Language, Result};
use sqlx::SqlitePool;

use crate::db::{concepts, synonyms};
use crate::services::adapter::{AiAdapter, NewTopicProposal, TopicRef};
use crate::services::TranslationCache;

use super::keywords::extract_keywords;
use super::normalize::{normalize, LanguageRules};
use super::script::{apply_speech_hint, detect_script};

/// Minimum normalized length (in characters) before fuzzy matching runs
const FUZZY_MIN_LEN: usize = 4;
/// Similarity floor for a fuzzy hit
const FUZZY_THRESHOLD: f64 = 0.7;
/// Relevance floor for accepting an AI-ranked existing concept
const AI_RELEVANCE_THRESHOLD: f64 = 0.95;
/// Whole-cascade deadline when the settings table carries no override
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(45);

/// Outcome of one resolution attempt
///
/// `concept_id` is `None` when every tier missed; the language and
/// normalized text are still reported so the attempt can be recorded
/// for gap analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub concept_id: Option<String>,
    pub language: Language,
    pub normalized_text: String,
}

/// Multilingual query-to-concept resolver
pub struct ConceptResolver {
    pool: SqlitePool,
    rules: LanguageRules,
    ai: Option<Arc<dyn AiAdapter>>,
    translations: TranslationCache,
    deadline: Duration,
}

impl ConceptResolver {
    /// Resolver without AI assistance; tiers 1-5 and 7 only
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            rules: LanguageRules::default(),
            ai: None,
            translations: TranslationCache::new(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Attach an AI adapter, enabling tier 6
    pub fn with_ai(mut self, ai: Arc<dyn AiAdapter>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Override the whole-cascade deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Resolve a query to a concept id
    ///
    /// The speech hint, when given, overrides a Latin-script detection:
    /// transliterated Hindi/Kannada ("Hinglish"/"Kanglish") reads as
    /// English to the script detector but the speech engine knows better.
    /// When the deadline expires mid-cascade the attempt degrades to a
    /// no-match resolution rather than an error.
    pub async fn resolve(&self, text: &str, speech_hint: Option<Language>) -> Result<Resolution> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("query text is empty".to_string()));
        }

        let detected = detect_script(trimmed);
        let language = apply_speech_hint(detected, speech_hint);
        if language != detected {
            tracing::info!(%detected, %language, "speech hint overrides script detection");
        }

        let normalized = normalize(trimmed, language, &self.rules);
        tracing::debug!(query = trimmed, %language, normalized, "resolving");

        match tokio::time::timeout(self.deadline, self.run_tiers(trimmed, language, &normalized))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    query = trimmed,
                    deadline_secs = self.deadline.as_secs(),
                    "resolution deadline expired"
                );
                Ok(Resolution {
                    concept_id: None,
                    language,
                    normalized_text: normalized,
                })
            }
        }
    }

    async fn run_tiers(
        &self,
        raw: &str,
        language: Language,
        normalized: &str,
    ) -> Result<Resolution> {
        let mut hit = self.exact_tier(normalized, language).await?;

        if hit.is_none() {
            hit = self.partial_tier(normalized).await?;
        }
        if hit.is_none() && language == Language::En {
            hit = self.keyword_tier(normalized).await?;
        }
        if hit.is_none() {
            hit = self.scan_tier(normalized, language).await?;
        }
        if hit.is_none() && language == Language::En {
            hit = self.fuzzy_tier(normalized).await?;
        }
        if hit.is_none() {
            hit = self.ai_tier(raw, language).await?;
        }

        if hit.is_none() {
            tracing::info!(query = raw, "no concept matched");
        }
        Ok(Resolution {
            concept_id: hit,
            language,
            normalized_text: normalized.to_string(),
        })
    }

    /// Tier 1: exact equality against stored terms
    async fn exact_tier(&self, normalized: &str, language: Language) -> Result<Option<String>> {
        let hit = synonyms::exact_match(&self.pool, normalized, language).await?;
        if let Some(syn) = &hit {
            tracing::info!(tier = "exact", term = %syn.term, concept_id = %syn.concept_id, "matched");
        } else {
            tracing::debug!(tier = "exact", "no match");
        }
        Ok(hit.map(|s| s.concept_id))
    }

    /// Tier 2: the query appears inside a stored term
    async fn partial_tier(&self, normalized: &str) -> Result<Option<String>> {
        let hit = synonyms::partial_match(&self.pool, normalized).await?;
        if let Some(syn) = &hit {
            tracing::info!(tier = "partial", term = %syn.term, concept_id = %syn.concept_id, "matched");
        } else {
            tracing::debug!(tier = "partial", "no match");
        }
        Ok(hit.map(|s| s.concept_id))
    }

    /// Tier 3: English keywords, most specific (longest) first
    async fn keyword_tier(&self, normalized: &str) -> Result<Option<String>> {
        let keywords = extract_keywords(normalized, &self.rules);
        tracing::debug!(tier = "keyword", ?keywords, "extracted");

        for keyword in &keywords {
            if let Some(syn) = synonyms::exact_match(&self.pool, keyword, Language::En).await? {
                tracing::info!(tier = "keyword", keyword = %keyword, concept_id = %syn.concept_id, "matched");
                return Ok(Some(syn.concept_id));
            }
            if let Some(syn) = synonyms::partial_match(&self.pool, keyword).await? {
                tracing::info!(tier = "keyword", keyword = %keyword, concept_id = %syn.concept_id, "matched inside term");
                return Ok(Some(syn.concept_id));
            }
        }
        tracing::debug!(tier = "keyword", "no match");
        Ok(None)
    }

    /// Tier 4: scan every synonym in the query language, normalizing the
    /// stored term and accepting containment in either direction
    async fn scan_tier(&self, normalized: &str, language: Language) -> Result<Option<String>> {
        let all = synonyms::synonyms_for_language(&self.pool, language).await?;
        for syn in &all {
            let candidate = normalize(&syn.term, language, &self.rules);
            if normalized.contains(&candidate) || candidate.contains(normalized) {
                tracing::info!(tier = "scan", term = %syn.term, concept_id = %syn.concept_id, "matched");
                return Ok(Some(syn.concept_id.clone()));
            }
        }
        tracing::debug!(tier = "scan", "no match");
        Ok(None)
    }

    /// Tier 5: typo tolerance over English synonyms. The best score wins;
    /// on a tie the earliest row in deterministic order is kept.
    async fn fuzzy_tier(&self, normalized: &str) -> Result<Option<String>> {
        if normalized.chars().count() < FUZZY_MIN_LEN {
            return Ok(None);
        }

        let all = synonyms::synonyms_for_language(&self.pool, Language::En).await?;
        let needle = normalized.to_lowercase();

        let mut best: Option<(&str, &str, f64)> = None;
        for syn in &all {
            let score = strsim::normalized_levenshtein(&needle, &syn.term.to_lowercase());
            if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, _, s)| score > s) {
                best = Some((syn.concept_id.as_str(), syn.term.as_str(), score));
            }
        }

        if let Some((concept_id, term, score)) = best {
            tracing::info!(tier = "fuzzy", term, concept_id, score, "matched");
            return Ok(Some(concept_id.to_string()));
        }
        tracing::debug!(tier = "fuzzy", "no match");
        Ok(None)
    }

    /// Tier 6: AI assistance. Adapter failures are logged at warn and
    /// treated as a miss; only database errors propagate.
    async fn ai_tier(&self, raw: &str, language: Language) -> Result<Option<String>> {
        let Some(ai) = self.ai.as_ref() else {
            tracing::debug!(tier = "ai", "no adapter configured");
            return Ok(None);
        };

        let topics = self.topic_refs().await?;

        // 6a: rank existing concepts against the raw query
        match ai.rank_existing_topics(raw, &topics).await {
            Ok(matches) => {
                if let Some(top) = matches.first() {
                    if top.relevance >= AI_RELEVANCE_THRESHOLD {
                        if let Some(id) = top.id.as_deref() {
                            if concepts::concept_exists(&self.pool, id).await? {
                                tracing::info!(tier = "ai", concept_id = id, relevance = top.relevance, "ranked existing concept");
                                return Ok(Some(id.to_string()));
                            }
                            tracing::warn!(tier = "ai", concept_id = id, "ranked concept not in store; ignoring");
                        }
                    } else {
                        tracing::debug!(tier = "ai", relevance = top.relevance, "top match below threshold");
                    }
                }
            }
            Err(err) => tracing::warn!(tier = "ai", error = %err, "topic ranking failed"),
        }

        // 6b: propose a brand-new concept and persist it
        match ai.propose_new_topic(raw, "", &topics).await {
            Ok(proposal) => {
                if let (Some(id), Some(name)) = (proposal.id.as_deref(), proposal.name.as_deref())
                {
                    let concept_id = id.to_uppercase();
                    let created = self.persist_proposal(&concept_id, name, &proposal).await?;
                    if created {
                        tracing::info!(tier = "ai", concept_id = %concept_id, name, "created new concept");
                    } else {
                        tracing::info!(tier = "ai", concept_id = %concept_id, "proposed concept already exists");
                    }
                    return Ok(Some(concept_id));
                }
                tracing::debug!(tier = "ai", "no usable proposal");
            }
            Err(err) => tracing::warn!(tier = "ai", error = %err, "topic proposal failed"),
        }

        // 6c: translate to English, retry the cheap lookups against
        // English synonyms only
        if language != Language::En {
            match self
                .translations
                .translate(ai.as_ref(), raw, Language::En)
                .await
            {
                Ok(translated) if !translated.is_empty() && translated != raw => {
                    let renormalized = normalize(&translated, Language::En, &self.rules);
                    if let Some(syn) = synonyms::exact_match_in_language(
                        &self.pool,
                        &renormalized,
                        Language::En,
                    )
                    .await?
                    {
                        tracing::info!(tier = "ai", translated = %renormalized, concept_id = %syn.concept_id, "translation exact match");
                        return Ok(Some(syn.concept_id));
                    }
                    if let Some(syn) = synonyms::partial_match_in_language(
                        &self.pool,
                        &renormalized,
                        Language::En,
                    )
                    .await?
                    {
                        tracing::info!(tier = "ai", translated = %renormalized, concept_id = %syn.concept_id, "translation partial match");
                        return Ok(Some(syn.concept_id));
                    }
                    tracing::debug!(tier = "ai", translated = %renormalized, "translation matched nothing");
                }
                Ok(_) => tracing::debug!(tier = "ai", "translation unchanged"),
                Err(err) => tracing::warn!(tier = "ai", error = %err, "translation failed"),
            }
        }

        Ok(None)
    }

    /// Existing concepts shaped for AI prompts
    async fn topic_refs(&self) -> Result<Vec<TopicRef>> {
        let all = concepts::list_concepts(&self.pool).await?;
        Ok(all
            .iter()
            .map(|c| TopicRef {
                id: c.concept_id.clone(),
                name: c.display_name(),
            })
            .collect())
    }

    /// Insert a proposed concept with its synonym sets. Returns false when
    /// the id was already taken, in which case the existing concept is
    /// reused. English synonyms are lowercased; when the proposal carries
    /// none, the lowercased name itself becomes the one English synonym.
    async fn persist_proposal(
        &self,
        concept_id: &str,
        name: &str,
        proposal: &NewTopicProposal,
    ) -> Result<bool> {
        if concepts::concept_exists(&self.pool, concept_id).await? {
            return Ok(false);
        }

        let concept = Concept {
            concept_id: concept_id.to_string(),
            subject: "General".to_string(),
            description_en: Some(name.to_string()),
            description_hi: proposal.description_hi.clone(),
            description_kn: proposal.description_kn.clone(),
            grade: "1-12".to_string(),
        };
        concepts::insert_concept(&self.pool, &concept).await?;

        if proposal.synonyms_en.is_empty() {
            synonyms::insert_synonym(&self.pool, concept_id, Language::En, &name.to_lowercase())
                .await?;
        } else {
            for term in &proposal.synonyms_en {
                synonyms::insert_synonym(&self.pool, concept_id, Language::En, &term.to_lowercase())
                    .await?;
            }
        }
        for term in &proposal.synonyms_hi {
            synonyms::insert_synonym(&self.pool, concept_id, Language::Hi, term).await?;
        }
        for term in &proposal.synonyms_kn {
            synonyms::insert_synonym(&self.pool, concept_id, Language::Kn, term).await?;
        }

        Ok(true)
    }
}
