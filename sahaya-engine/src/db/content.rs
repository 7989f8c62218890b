//! Content table operations
//!
//! The ranking pipeline's ladder tiers are all served by [`fetch_tier`]
//! with different verification/source filters. Rows come back ordered by
//! target-language match first, then recency, which is the within-tier
//! order the pipeline exposes.

use chrono::Utc;
use sahaya_common::models::{ContentItem, SourceType};
use sahaya_common::{Error, Language, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const CONTENT_COLUMNS: &str = "id, concept_id, uploaded_by, subject, grade, language, \
     content_type, title, content_url, description, summary, source_type, is_verified, created_at";

fn content_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ContentItem> {
    let language: String = row.get("language");
    let source_type: String = row.get("source_type");
    let is_verified: i64 = row.get("is_verified");

    Ok(ContentItem {
        id: row.get("id"),
        concept_id: row.get("concept_id"),
        uploaded_by: row.get("uploaded_by"),
        subject: row.get("subject"),
        grade: row.get("grade"),
        language: language.parse()?,
        content_type: row.get("content_type"),
        title: row.get("title"),
        content_url: row.get("content_url"),
        description: row.get("description"),
        summary: row.get("summary"),
        source_type: SourceType::parse(&source_type)
            .ok_or_else(|| Error::Internal(format!("unknown source_type: {}", source_type)))?,
        is_verified: is_verified != 0,
        created_at: row.get("created_at"),
    })
}

/// Fetch one ladder tier's rows for a concept
///
/// Filters by verification state and (optionally) source type; orders by
/// target-language match first, then most recent.
pub async fn fetch_tier(
    pool: &SqlitePool,
    concept_id: &str,
    verified: bool,
    source: Option<SourceType>,
    target_language: Language,
    limit: u32,
) -> Result<Vec<ContentItem>> {
    let rows = match source {
        Some(source) => {
            let sql = format!(
                "SELECT {} FROM content_items \
                 WHERE concept_id = ? AND is_verified = ? AND source_type = ? \
                 ORDER BY CASE WHEN language = ? THEN 0 ELSE 1 END, created_at DESC \
                 LIMIT ?",
                CONTENT_COLUMNS
            );
            sqlx::query(&sql)
                .bind(concept_id)
                .bind(verified as i64)
                .bind(source.as_str())
                .bind(target_language.as_str())
                .bind(limit as i64)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {} FROM content_items \
                 WHERE concept_id = ? AND is_verified = ? \
                 ORDER BY CASE WHEN language = ? THEN 0 ELSE 1 END, created_at DESC \
                 LIMIT ?",
                CONTENT_COLUMNS
            );
            sqlx::query(&sql)
                .bind(concept_id)
                .bind(verified as i64)
                .bind(target_language.as_str())
                .bind(limit as i64)
                .fetch_all(pool)
                .await?
        }
    };

    rows.iter().map(content_from_row).collect()
}

pub async fn find_by_url(pool: &SqlitePool, content_url: &str) -> Result<Option<ContentItem>> {
    let sql = format!(
        "SELECT {} FROM content_items WHERE content_url = ?",
        CONTENT_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(content_url)
        .fetch_optional(pool)
        .await?;
    row.map(|r| content_from_row(&r)).transpose()
}

/// Insert a content item, converging on the existing row when the URL is
/// already stored (upsert-or-fetch; concurrent identical inserts are safe).
pub async fn insert_or_fetch_by_url(
    pool: &SqlitePool,
    item: &ContentItem,
) -> Result<ContentItem> {
    sqlx::query(
        r#"
        INSERT INTO content_items (
            id, concept_id, uploaded_by, subject, grade, language, content_type,
            title, content_url, description, summary, source_type, is_verified, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(content_url) DO NOTHING
        "#,
    )
    .bind(&item.id)
    .bind(&item.concept_id)
    .bind(&item.uploaded_by)
    .bind(&item.subject)
    .bind(&item.grade)
    .bind(item.language.as_str())
    .bind(&item.content_type)
    .bind(&item.title)
    .bind(&item.content_url)
    .bind(&item.description)
    .bind(&item.summary)
    .bind(item.source_type.as_str())
    .bind(item.is_verified as i64)
    .bind(item.created_at)
    .execute(pool)
    .await?;

    find_by_url(pool, &item.content_url)
        .await?
        .ok_or_else(|| Error::Internal("content row missing after insert".to_string()))
}

/// Parameters for a manual content upload
#[derive(Debug, Clone)]
pub struct NewContent {
    pub concept_id: String,
    pub title: String,
    pub content_url: String,
    pub description: Option<String>,
    pub language: Language,
    pub content_type: String,
    pub uploaded_by: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
}

/// Store an uploaded item: internal source, unverified until reviewed
pub async fn upload_content(pool: &SqlitePool, new: NewContent) -> Result<ContentItem> {
    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        concept_id: new.concept_id,
        uploaded_by: new.uploaded_by,
        subject: new.subject,
        grade: new.grade,
        language: new.language,
        content_type: new.content_type,
        title: new.title,
        content_url: new.content_url,
        description: new.description,
        summary: None,
        source_type: SourceType::Internal,
        is_verified: false,
        created_at: Utc::now(),
    };
    insert_or_fetch_by_url(pool, &item).await
}
