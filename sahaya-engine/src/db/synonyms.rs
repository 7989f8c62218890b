//! Synonym table operations
//!
//! These queries back the matching cascade's SQL tiers. Matching runs
//! inside SQL with `lower()` equality and `instr()` containment (never
//! `LIKE`, so `%`/`_` in user text are not wildcards). All "first row"
//! picks share one deterministic ordering: shortest term first, then term,
//! then concept id, which makes cascade outcomes reproducible.

use sahaya_common::models::ConceptSynonym;
use sahaya_common::{Language, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Deterministic "first row" ordering shared by every lookup
const SYNONYM_ORDER: &str = "ORDER BY length(term) ASC, term ASC, concept_id ASC";

fn synonym_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ConceptSynonym> {
    let language: String = row.get("language");
    Ok(ConceptSynonym {
        id: row.get("id"),
        concept_id: row.get("concept_id"),
        language: language.parse()?,
        term: row.get("term"),
    })
}

/// Exact-equality lookup across all stored languages
///
/// English queries compare case-insensitively; Hindi/Kannada queries use
/// exact code-point equality.
pub async fn exact_match(
    pool: &SqlitePool,
    normalized: &str,
    query_language: Language,
) -> Result<Option<ConceptSynonym>> {
    let sql = if query_language == Language::En {
        format!(
            "SELECT id, concept_id, language, term FROM concept_synonyms \
             WHERE lower(term) = lower(?) {} LIMIT 1",
            SYNONYM_ORDER
        )
    } else {
        format!(
            "SELECT id, concept_id, language, term FROM concept_synonyms \
             WHERE term = ? {} LIMIT 1",
            SYNONYM_ORDER
        )
    };

    let row = sqlx::query(&sql).bind(normalized).fetch_optional(pool).await?;
    row.map(|r| synonym_from_row(&r)).transpose()
}

/// Substring lookup: the query must appear inside a stored term
pub async fn partial_match(
    pool: &SqlitePool,
    normalized: &str,
) -> Result<Option<ConceptSynonym>> {
    let sql = format!(
        "SELECT id, concept_id, language, term FROM concept_synonyms \
         WHERE instr(lower(term), lower(?)) > 0 {} LIMIT 1",
        SYNONYM_ORDER
    );

    let row = sqlx::query(&sql).bind(normalized).fetch_optional(pool).await?;
    row.map(|r| synonym_from_row(&r)).transpose()
}

/// Exact-equality lookup restricted to one stored language
pub async fn exact_match_in_language(
    pool: &SqlitePool,
    term: &str,
    language: Language,
) -> Result<Option<ConceptSynonym>> {
    let sql = format!(
        "SELECT id, concept_id, language, term FROM concept_synonyms \
         WHERE language = ? AND lower(term) = lower(?) {} LIMIT 1",
        SYNONYM_ORDER
    );

    let row = sqlx::query(&sql)
        .bind(language.as_str())
        .bind(term)
        .fetch_optional(pool)
        .await?;
    row.map(|r| synonym_from_row(&r)).transpose()
}

/// Substring lookup restricted to one stored language
pub async fn partial_match_in_language(
    pool: &SqlitePool,
    term: &str,
    language: Language,
) -> Result<Option<ConceptSynonym>> {
    let sql = format!(
        "SELECT id, concept_id, language, term FROM concept_synonyms \
         WHERE language = ? AND instr(lower(term), lower(?)) > 0 {} LIMIT 1",
        SYNONYM_ORDER
    );

    let row = sqlx::query(&sql)
        .bind(language.as_str())
        .bind(term)
        .fetch_optional(pool)
        .await?;
    row.map(|r| synonym_from_row(&r)).transpose()
}

/// Every synonym stored for one language, in deterministic order
pub async fn synonyms_for_language(
    pool: &SqlitePool,
    language: Language,
) -> Result<Vec<ConceptSynonym>> {
    let sql = format!(
        "SELECT id, concept_id, language, term FROM concept_synonyms \
         WHERE language = ? {}",
        SYNONYM_ORDER
    );

    let rows = sqlx::query(&sql)
        .bind(language.as_str())
        .fetch_all(pool)
        .await?;
    rows.iter().map(synonym_from_row).collect()
}

/// Every synonym attached to one concept
pub async fn synonyms_for_concept(
    pool: &SqlitePool,
    concept_id: &str,
) -> Result<Vec<ConceptSynonym>> {
    let sql = format!(
        "SELECT id, concept_id, language, term FROM concept_synonyms \
         WHERE concept_id = ? {}",
        SYNONYM_ORDER
    );

    let rows = sqlx::query(&sql).bind(concept_id).fetch_all(pool).await?;
    rows.iter().map(synonym_from_row).collect()
}

/// Insert a synonym; re-inserting the same (concept, language, term) is a
/// no-op thanks to the unique constraint.
pub async fn insert_synonym(
    pool: &SqlitePool,
    concept_id: &str,
    language: Language,
    term: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO concept_synonyms (id, concept_id, language, term)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(concept_id, language, term) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(concept_id)
    .bind(language.as_str())
    .bind(term)
    .execute(pool)
    .await?;

    Ok(())
}
