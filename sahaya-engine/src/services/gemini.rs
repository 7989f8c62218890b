//! Gemini HTTP client
//!
//! Implements both adapter traits over the Generative Language REST API,
//! walking a fixed model-fallback list. An overloaded model (503) is
//! retried after a short pause; quota errors (429) and timeouts advance
//! to the next model immediately. Structured answers come back as JSON,
//! sometimes wrapped in Markdown code fences, so those are stripped
//! before parsing. Web search uses the `google_search` tool and reads
//! grounding metadata, with a regex URL fallback when grounding is
//! absent.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use sahaya_common::Language;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::adapter::{
    AdapterError, AiAdapter, NewTopicProposal, SearchHit, TopicMatch, TopicRef,
    TranslationResult, WebSearchAdapter,
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fallback models in order of preference
const GEMINI_MODELS: &[&str] = &[
    "gemini-flash-latest",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash-exp",
];

/// Extra attempts per model when it reports overload
const OVERLOAD_RETRIES: usize = 2;
const OVERLOAD_BACKOFF: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini generateContent response, reduced to the parts we read
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: String,
}

/// JSON payload of a topic-ranking answer
#[derive(Debug, Deserialize)]
struct SmartSearchResponse {
    #[serde(default)]
    matched_topics: Vec<TopicMatch>,
}

/// JSON payload of a new-topic proposal
#[derive(Debug, Deserialize)]
struct TopicSuggestionResponse {
    #[serde(default)]
    suggested_new_topic: Option<String>,
    #[serde(default)]
    suggested_new_topic_id: Option<String>,
    #[serde(default)]
    suggested_new_topic_hi: Option<String>,
    #[serde(default)]
    suggested_new_topic_kn: Option<String>,
    #[serde(default)]
    synonyms_en: Vec<String>,
    #[serde(default)]
    synonyms_hi: Vec<String>,
    #[serde(default)]
    synonyms_kn: Vec<String>,
}

/// JSON payload of a translation answer
#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    source_language: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, AdapterError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// POST a generateContent body, falling across models
    async fn generate(&self, body: &Value) -> Result<GenerateResponse, AdapterError> {
        let mut last_error: Option<AdapterError> = None;

        for &model in GEMINI_MODELS {
            tracing::debug!(model, "querying Gemini");
            for attempt in 0..=OVERLOAD_RETRIES {
                let url = format!(
                    "{}/{}:generateContent?key={}",
                    GEMINI_BASE_URL, model, self.api_key
                );
                match self.http_client.post(&url).json(body).send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status == StatusCode::OK {
                            return response
                                .json::<GenerateResponse>()
                                .await
                                .map_err(|e| AdapterError::Parse(e.to_string()));
                        } else if status == StatusCode::SERVICE_UNAVAILABLE {
                            tracing::warn!(model, attempt, "model overloaded");
                            last_error = Some(AdapterError::Api {
                                status: status.as_u16(),
                                message: format!("model {} overloaded", model),
                            });
                            if attempt < OVERLOAD_RETRIES {
                                tokio::time::sleep(OVERLOAD_BACKOFF).await;
                                continue;
                            }
                            break;
                        } else if status == StatusCode::TOO_MANY_REQUESTS {
                            tracing::warn!(model, "quota exceeded");
                            last_error = Some(AdapterError::Api {
                                status: status.as_u16(),
                                message: format!("model {} quota exceeded", model),
                            });
                            break;
                        } else {
                            let message = response.text().await.unwrap_or_default();
                            tracing::warn!(model, status = status.as_u16(), "Gemini API error");
                            last_error = Some(AdapterError::Api {
                                status: status.as_u16(),
                                message,
                            });
                            break;
                        }
                    }
                    Err(e) if e.is_timeout() => {
                        tracing::warn!(model, "request timed out");
                        last_error =
                            Some(AdapterError::Transport(format!("model {} timeout", model)));
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(model, error = %e, "request failed");
                        last_error = Some(AdapterError::Transport(e.to_string()));
                        break;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AdapterError::Transport("all Gemini models failed".to_string())))
    }

    /// Plain prompt in, first candidate text out
    async fn generate_text(&self, prompt: String) -> Result<String, AdapterError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });
        let response = self.generate(&body).await?;
        first_candidate_text(&response)
            .ok_or_else(|| AdapterError::Parse("response carried no text".to_string()))
    }
}

fn language_name(language: Language) -> &'static str {
    match language {
        Language::En => "English",
        Language::Hi => "Hindi",
        Language::Kn => "Kannada",
    }
}

fn first_candidate_text(response: &GenerateResponse) -> Option<String> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.clone())
}

/// Models often wrap JSON answers in ```json fences; unwrap before parsing
fn strip_code_fences(text: &str) -> &str {
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = text.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        text
    };
    inner.trim()
}

fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, AdapterError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| AdapterError::Parse(e.to_string()))
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r#"https?://[^\s)"']+"#).expect("valid URL pattern"))
}

fn extract_urls(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn format_topics(topics: &[TopicRef]) -> String {
    if topics.is_empty() {
        return "No existing topics".to_string();
    }
    topics
        .iter()
        .map(|t| format!("- ID: {}, Name: {}\n", t.id, t.name))
        .collect()
}

/// Grounding chunks first; when none carry a web source, fall back to
/// scraping URLs out of the answer text
fn hits_from_response(response: &GenerateResponse, max_results: usize) -> Vec<SearchHit> {
    let Some(candidate) = response.candidates.first() else {
        return Vec::new();
    };

    let grounded: Vec<SearchHit> = candidate
        .grounding_metadata
        .iter()
        .flat_map(|m| m.grounding_chunks.iter())
        .take(max_results)
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| SearchHit {
            title: web.title.clone(),
            url: web.uri.clone(),
            snippet: String::new(),
        })
        .collect();

    if !grounded.is_empty() {
        return grounded;
    }

    let text = candidate
        .content
        .as_ref()
        .and_then(|c| c.parts.first())
        .map(|p| p.text.as_str())
        .unwrap_or("");

    extract_urls(text)
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, url)| SearchHit {
            title: format!("Resource {}", i + 1),
            url,
            snippet: String::new(),
        })
        .collect()
}

#[async_trait]
impl AiAdapter for GeminiClient {
    async fn rank_existing_topics(
        &self,
        query: &str,
        topics: &[TopicRef],
    ) -> Result<Vec<TopicMatch>, AdapterError> {
        let prompt = format!(
            r#"You are a smart search assistant for an educational platform.

Given the search query (which may be in English, Hindi, or Kannada), find relevant topics.

Search Query: {query}

Existing Topics:
{topics}

Respond in JSON format only:
{{
    "original_query": "{query}",
    "translated_query": "English translation of query",
    "detected_language": "en" or "hi" or "kn",
    "matched_topics": [
        {{"id": "topic_id", "name": "Topic Name", "relevance": 0.0 to 1.0}}
    ],
    "search_keywords": ["keyword1", "keyword2"]
}}

Rules:
1. Translate the query to English if it's in Hindi or Kannada
2. Find all relevant topics (relevance >= 0.5)
3. Sort matched_topics by relevance (highest first)
4. Extract useful search keywords from the query
"#,
            query = query,
            topics = format_topics(topics),
        );

        let text = self.generate_text(prompt).await?;
        let parsed: SmartSearchResponse = parse_json_payload(&text)?;
        Ok(parsed.matched_topics)
    }

    async fn propose_new_topic(
        &self,
        title: &str,
        description: &str,
        topics: &[TopicRef],
    ) -> Result<NewTopicProposal, AdapterError> {
        let description = if description.is_empty() {
            "No description provided"
        } else {
            description
        };
        let prompt = format!(
            r#"You are a topic classifier for an educational content platform for teachers in India.

Given the following content title and description, find the best matching topic from the existing topics list.
If no topic matches well (confidence < 0.7), suggest a new topic name with translations.

Content Title: {title}
Content Description: {description}

Existing Topics:
{topics}

Respond in JSON format only:
{{
    "matched_topic_id": "topic_id_here" or null,
    "matched_topic_name": "Topic Name" or null,
    "confidence": 0.0 to 1.0,
    "suggested_new_topic": "New Topic Name in English" or null,
    "suggested_new_topic_id": "new_topic_id" or null,
    "suggested_new_topic_hi": "Hindi translation" or null,
    "suggested_new_topic_kn": "Kannada translation" or null,
    "synonyms_en": ["english synonym 1", "english synonym 2"] or [],
    "synonyms_hi": ["hindi synonym 1", "hindi synonym 2"] or [],
    "synonyms_kn": ["kannada synonym 1", "kannada synonym 2"] or []
}}

Rules:
1. If confidence >= 0.7, return the matched topic (no need for translations)
2. If confidence < 0.7, suggest a new topic with:
   - English name and snake_case ID
   - Hindi translation (Devanagari script)
   - Kannada translation (Kannada script)
   - Common synonyms in all 3 languages for better search
3. Topic names should be educational and descriptive
4. New topic IDs should be lowercase with underscores (e.g., "air_pollution")
5. Synonyms should include common ways teachers might search for this topic
"#,
            title = title,
            description = description,
            topics = format_topics(topics),
        );

        let text = self.generate_text(prompt).await?;
        let parsed: TopicSuggestionResponse = parse_json_payload(&text)?;
        Ok(NewTopicProposal {
            id: parsed.suggested_new_topic_id,
            name: parsed.suggested_new_topic,
            description_hi: parsed.suggested_new_topic_hi,
            description_kn: parsed.suggested_new_topic_kn,
            synonyms_en: parsed.synonyms_en,
            synonyms_hi: parsed.synonyms_hi,
            synonyms_kn: parsed.synonyms_kn,
        })
    }

    async fn translate(
        &self,
        text: &str,
        target: Language,
    ) -> Result<TranslationResult, AdapterError> {
        let prompt = format!(
            r#"Translate the following text to {target}.
Also detect the source language.

Text: {text}

Respond in JSON format only:
{{
    "translated_text": "translated text here",
    "source_language": "en" or "hi" or "kn"
}}
"#,
            target = language_name(target),
            text = text,
        );

        let answer = self.generate_text(prompt).await?;
        let parsed: TranslationResponse = parse_json_payload(&answer)?;
        Ok(TranslationResult {
            text: parsed.translated_text.unwrap_or_else(|| text.to_string()),
            source_language: parsed.source_language.and_then(|s| s.parse().ok()),
        })
    }

    async fn summarize(
        &self,
        title: &str,
        snippet: &str,
        topic: &str,
        elaboration: Option<&str>,
    ) -> Result<String, AdapterError> {
        let snippet = if snippet.is_empty() {
            "No description provided"
        } else {
            snippet
        };
        let mut prompt = format!(
            "You are helping teachers in India evaluate online resources.\n\n\
             Write a 1-2 sentence summary of the resource below for a teacher \
             looking for help with the topic \"{topic}\".\n",
        );
        if let Some(detail) = elaboration {
            prompt.push_str(&format!("The teacher's situation: {detail}\n"));
        }
        prompt.push_str(&format!(
            "\nResource Title: {title}\nResource Description: {snippet}\n\n\
             Respond with the summary text only, no preamble.\n",
        ));

        let answer = self.generate_text(prompt).await?;
        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl WebSearchAdapter for GeminiClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        elaboration: Option<&str>,
    ) -> Result<Vec<SearchHit>, AdapterError> {
        let mut prompt = format!(
            "Find {max_results} educational resources (videos, articles, websites) about: \
             {query}. For each result, provide the title, URL, and a brief description. \
             Focus on educational content suitable for teachers and students.",
        );
        if let Some(detail) = elaboration {
            prompt.push_str(&format!(" The teacher describes their situation as: {detail}"));
        }

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "tools": [{
                "google_search": {}
            }]
        });

        let response = self.generate(&body).await?;
        let hits = hits_from_response(&response, max_results);
        tracing::debug!(query, count = hits.len(), "web search results");
        Ok(hits)
    }
}
