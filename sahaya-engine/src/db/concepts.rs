//! Concept table operations

use sahaya_common::models::Concept;
use sahaya_common::Result;
use sqlx::{Row, SqlitePool};

fn concept_from_row(row: &sqlx::sqlite::SqliteRow) -> Concept {
    Concept {
        concept_id: row.get("concept_id"),
        subject: row.get("subject"),
        description_en: row.get("description_en"),
        description_hi: row.get("description_hi"),
        description_kn: row.get("description_kn"),
        grade: row.get("grade"),
    }
}

const CONCEPT_COLUMNS: &str =
    "concept_id, subject, description_en, description_hi, description_kn, grade";

/// Load a concept by id
pub async fn get_concept(pool: &SqlitePool, concept_id: &str) -> Result<Option<Concept>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM concepts WHERE concept_id = ?",
        CONCEPT_COLUMNS
    ))
    .bind(concept_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| concept_from_row(&r)))
}

pub async fn concept_exists(pool: &SqlitePool, concept_id: &str) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM concepts WHERE concept_id = ?")
        .bind(concept_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Insert a concept; an existing row with the same id is left untouched
pub async fn insert_concept(pool: &SqlitePool, concept: &Concept) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO concepts (concept_id, subject, description_en, description_hi, description_kn, grade)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(concept_id) DO NOTHING
        "#,
    )
    .bind(&concept.concept_id)
    .bind(&concept.subject)
    .bind(&concept.description_en)
    .bind(&concept.description_hi)
    .bind(&concept.description_kn)
    .bind(&concept.grade)
    .execute(pool)
    .await?;

    Ok(())
}

/// All concepts, ordered by id
pub async fn list_concepts(pool: &SqlitePool) -> Result<Vec<Concept>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM concepts ORDER BY concept_id ASC",
        CONCEPT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(concept_from_row).collect())
}
