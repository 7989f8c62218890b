//! Content ranking pipeline
//!
//! Given a resolved concept id, walks a strict preference ladder and
//! returns the first tier that yields anything. Tiers are never merged:
//!
//! 1. verified internal uploads    -> `internal`
//! 2. verified content, any source -> `internal`
//! 3. unverified internal uploads  -> `internal_unverified`
//! 4. unverified external content  -> `external_fallback`
//! 5. live web search, persisted   -> `web_search`
//!
//! A completely empty ladder returns `([], internal)` so callers can
//! render a uniform "nothing found" state. The scored variant re-sorts
//! within the chosen tier by language match and feedback score; it never
//! changes which tier was selected.

use std::sync::Arc;

use chrono::Utc;
use sahaya_common::models::{ContentItem, FeedbackStats, SourceLabel, SourceType};
use sahaya_common::{Language, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{concepts, content, feedback};
use crate::services::adapter::{AiAdapter, WebSearchAdapter};

/// How many hits to request from the web search
const WEB_SEARCH_RESULTS: usize = 5;

/// A content item paired with its feedback aggregate
#[derive(Debug, Clone)]
pub struct RankedItem {
    pub content: ContentItem,
    pub stats: FeedbackStats,
}

/// Tiered content retrieval for a resolved concept
pub struct ContentPipeline {
    pool: SqlitePool,
    ai: Option<Arc<dyn AiAdapter>>,
    web: Option<Arc<dyn WebSearchAdapter>>,
}

impl ContentPipeline {
    /// Pipeline over stored content only; the web tier stays dark
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            ai: None,
            web: None,
        }
    }

    /// Attach the summary generator used for web-discovered items
    pub fn with_ai(mut self, ai: Arc<dyn AiAdapter>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Attach the web-search adapter, enabling ladder tier 5
    pub fn with_web_search(mut self, web: Arc<dyn WebSearchAdapter>) -> Self {
        self.web = Some(web);
        self
    }

    /// Walk the ladder and return the first non-empty tier
    pub async fn rank(
        &self,
        concept_id: &str,
        target_language: Language,
        limit: u32,
        elaboration: Option<&str>,
    ) -> Result<(Vec<ContentItem>, SourceLabel)> {
        let tiers = [
            (true, Some(SourceType::Internal), SourceLabel::Internal),
            (true, None, SourceLabel::Internal),
            (
                false,
                Some(SourceType::Internal),
                SourceLabel::InternalUnverified,
            ),
            (
                false,
                Some(SourceType::External),
                SourceLabel::ExternalFallback,
            ),
        ];

        for (verified, source, label) in tiers {
            let items = content::fetch_tier(
                &self.pool,
                concept_id,
                verified,
                source,
                target_language,
                limit,
            )
            .await?;
            if !items.is_empty() {
                tracing::debug!(
                    concept_id,
                    label = label.as_str(),
                    count = items.len(),
                    "ladder tier hit"
                );
                return Ok((items, label));
            }
        }

        let mut web_items = self.web_search_tier(concept_id, elaboration).await?;
        if !web_items.is_empty() {
            web_items.truncate(limit as usize);
            return Ok((web_items, SourceLabel::WebSearch));
        }

        tracing::info!(concept_id, "no content found in any tier");
        Ok((Vec::new(), SourceLabel::Internal))
    }

    /// Like [`rank`](Self::rank), with feedback aggregates attached and the
    /// chosen tier re-sorted by (language match, feedback score) descending.
    /// Fresh web results carry no feedback yet, so they keep search order
    /// and a zeroed aggregate.
    pub async fn rank_scored(
        &self,
        concept_id: &str,
        target_language: Language,
        limit: u32,
        elaboration: Option<&str>,
    ) -> Result<(Vec<RankedItem>, SourceLabel)> {
        let (items, label) = self
            .rank(concept_id, target_language, limit, elaboration)
            .await?;

        if label == SourceLabel::WebSearch {
            let ranked = items
                .into_iter()
                .map(|content| RankedItem {
                    content,
                    stats: FeedbackStats::default(),
                })
                .collect();
            return Ok((ranked, label));
        }

        let mut ranked = Vec::with_capacity(items.len());
        for content in items {
            let stats = feedback::feedback_stats(&self.pool, &content.id).await?;
            ranked.push(RankedItem { content, stats });
        }

        ranked.sort_by(|a, b| {
            let a_key = (a.content.language == target_language, a.stats.score());
            let b_key = (b.content.language == target_language, b.stats.score());
            b_key
                .partial_cmp(&a_key)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok((ranked, label))
    }

    /// Ladder tier 5: search the web for the concept's display name,
    /// deduplicate by URL against the store, summarize, and persist
    /// discoveries as unverified external English content.
    async fn web_search_tier(
        &self,
        concept_id: &str,
        elaboration: Option<&str>,
    ) -> Result<Vec<ContentItem>> {
        let Some(web) = self.web.as_ref() else {
            tracing::debug!("web search not configured");
            return Ok(Vec::new());
        };

        let Some(concept) = concepts::get_concept(&self.pool, concept_id).await? else {
            tracing::warn!(concept_id, "unknown concept; skipping web search");
            return Ok(Vec::new());
        };

        let topic = concept.display_name();
        tracing::info!(concept_id, topic, "no stored content; searching the web");

        let hits = match web.search(&topic, WEB_SEARCH_RESULTS, elaboration).await {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!(error = %err, "web search failed");
                return Ok(Vec::new());
            }
        };

        let mut items = Vec::new();
        for hit in &hits {
            if hit.url.is_empty() {
                continue;
            }

            if let Some(mut existing) = content::find_by_url(&self.pool, &hit.url).await? {
                // Known URL. When the teacher gave extra context, re-tailor
                // the summary for this session without overwriting the
                // stored one.
                if elaboration.is_some() {
                    let description = existing.description.clone().unwrap_or_default();
                    if let Some(summary) = self
                        .summarize(&existing.title, &description, &topic, elaboration)
                        .await
                    {
                        existing.summary = Some(summary);
                    }
                }
                items.push(existing);
                continue;
            }

            let summary = self
                .summarize(&hit.title, &hit.snippet, &topic, elaboration)
                .await;

            let item = ContentItem {
                id: Uuid::new_v4().to_string(),
                concept_id: concept_id.to_string(),
                uploaded_by: None,
                subject: Some(concept.subject.clone()),
                grade: Some(concept.grade.clone()),
                language: Language::En,
                content_type: classify_content_type(&hit.url).to_string(),
                title: if hit.title.is_empty() {
                    "External Resource".to_string()
                } else {
                    hit.title.clone()
                },
                content_url: hit.url.clone(),
                description: Some(if hit.snippet.is_empty() {
                    "Found via web search".to_string()
                } else {
                    hit.snippet.clone()
                }),
                summary,
                source_type: SourceType::External,
                is_verified: false,
                created_at: Utc::now(),
            };

            let stored = content::insert_or_fetch_by_url(&self.pool, &item).await?;
            items.push(stored);
        }

        tracing::info!(concept_id, count = items.len(), "web tier assembled");
        Ok(items)
    }

    /// AI summary, or None when no adapter is configured or the call fails
    async fn summarize(
        &self,
        title: &str,
        snippet: &str,
        topic: &str,
        elaboration: Option<&str>,
    ) -> Option<String> {
        let ai = self.ai.as_ref()?;
        match ai.summarize(title, snippet, topic, elaboration).await {
            Ok(summary) if !summary.is_empty() => Some(summary),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "summary generation failed");
                None
            }
        }
    }
}

/// Coarse content type from a URL: known video hosts, PDFs, else article
pub fn classify_content_type(url: &str) -> &'static str {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        "video"
    } else if url.ends_with(".pdf") {
        "document"
    } else {
        "article"
    }
}
